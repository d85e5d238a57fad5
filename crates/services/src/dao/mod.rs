pub mod base;
pub mod bot_chat;
pub mod identity;

pub use base::BaseDao;
