mod bot_chat;
mod identity;

pub use bot_chat::*;
pub use identity::*;
