pub mod chats;
pub mod invite;
pub mod verify;
