use async_trait::async_trait;
use bson::{DateTime, doc};
use mongodb::Database;

use gatekeeper_db::models::BotChat;

use super::base::{BaseDao, DaoResult};
use crate::store::BotChatStore;

pub struct BotChatDao {
    pub base: BaseDao<BotChat>,
}

impl BotChatDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, BotChat::COLLECTION),
        }
    }
}

#[async_trait]
impl BotChatStore for BotChatDao {
    async fn upsert(&self, chat_id: i64, chat_name: &str) -> DaoResult<()> {
        self.base
            .upsert_one(
                doc! { "chat_id": chat_id },
                doc! {
                    "$set": { "chat_name": chat_name },
                    "$setOnInsert": { "created_at": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }

    async fn remove(&self, chat_id: i64) -> DaoResult<u64> {
        self.base.hard_delete(doc! { "chat_id": chat_id }).await
    }

    async fn find_by_chat_id(&self, chat_id: i64) -> DaoResult<Option<BotChat>> {
        self.base.find_one(doc! { "chat_id": chat_id }).await
    }

    async fn count(&self) -> DaoResult<u64> {
        self.base.count(doc! {}).await
    }
}
