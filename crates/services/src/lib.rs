pub mod admission;
pub mod auth;
pub mod dao;
pub mod invite;
pub mod store;
pub mod telegram;
pub mod verification;

pub use admission::AdmissionService;
pub use auth::AuthService;
pub use dao::*;
pub use invite::InviteService;
pub use telegram::TelegramClient;
pub use verification::VerificationService;
