use async_trait::async_trait;
use gatekeeper_db::models::{ActivityState, BotChat, Identity};

use crate::dao::base::DaoResult;

/// Record store seam for identity rows. Core logic (verification
/// conversation, admission reconciler, HTTP routes) talks to the store
/// only through this trait; the Mongo-backed DAO implements it for
/// production and tests substitute an in-memory variant.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert(&self, identity: &Identity) -> DaoResult<()>;

    async fn find_by_external_id(&self, external_id: &str) -> DaoResult<Option<Identity>>;

    async fn find_by_telegram_id(&self, telegram_id: i64) -> DaoResult<Option<Identity>>;

    /// Promotes a pending identity: sets status to verified and binds the
    /// Telegram account. The only code path that sets `telegram_id`.
    async fn mark_verified(
        &self,
        external_id: &str,
        telegram_id: i64,
        telegram_name: Option<&str>,
    ) -> DaoResult<bool>;

    async fn set_activity(&self, telegram_id: i64, activity: ActivityState) -> DaoResult<bool>;
}

/// Registry of chats the bot governs.
#[async_trait]
pub trait BotChatStore: Send + Sync {
    /// Idempotent: repeated joins for the same chat collapse to one row.
    async fn upsert(&self, chat_id: i64, chat_name: &str) -> DaoResult<()>;

    async fn remove(&self, chat_id: i64) -> DaoResult<u64>;

    async fn find_by_chat_id(&self, chat_id: i64) -> DaoResult<Option<BotChat>>;

    async fn count(&self) -> DaoResult<u64>;
}
