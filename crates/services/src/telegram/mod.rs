mod client;
mod types;
mod webapp;

pub use client::{BotProfile, ChatPlatform, TelegramClient, TelegramError};
pub use types::*;
pub use webapp::{InitData, InitDataError, verify_init_data};
