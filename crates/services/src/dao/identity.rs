use async_trait::async_trait;
use bson::{DateTime, doc};
use mongodb::Database;

use gatekeeper_db::models::{ActivityState, Identity, IdentityStatus};

use super::base::{BaseDao, DaoResult};
use crate::store::IdentityStore;

pub struct IdentityDao {
    pub base: BaseDao<Identity>,
}

impl IdentityDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Identity::COLLECTION),
        }
    }

    /// Provisioning helper used by admin tooling: creates a pending
    /// identity with a known activation code.
    pub async fn create_pending(
        &self,
        external_id: String,
        activation_code: String,
        invite_link: Option<String>,
    ) -> DaoResult<Identity> {
        let now = DateTime::now();
        let identity = Identity {
            id: None,
            external_id,
            activation_code,
            status: IdentityStatus::Pending,
            telegram_id: None,
            telegram_name: None,
            invite_link,
            activity: ActivityState::Unknown,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&identity).await?;
        self.base.find_by_id(id).await
    }
}

#[async_trait]
impl IdentityStore for IdentityDao {
    async fn insert(&self, identity: &Identity) -> DaoResult<()> {
        self.base.insert_one(identity).await?;
        Ok(())
    }

    async fn find_by_external_id(&self, external_id: &str) -> DaoResult<Option<Identity>> {
        self.base.find_one(doc! { "external_id": external_id }).await
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> DaoResult<Option<Identity>> {
        self.base.find_one(doc! { "telegram_id": telegram_id }).await
    }

    async fn mark_verified(
        &self,
        external_id: &str,
        telegram_id: i64,
        telegram_name: Option<&str>,
    ) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "external_id": external_id },
                doc! {
                    "$set": {
                        "status": "verified",
                        "telegram_id": telegram_id,
                        "telegram_name": telegram_name,
                    }
                },
            )
            .await
    }

    async fn set_activity(&self, telegram_id: i64, activity: ActivityState) -> DaoResult<bool> {
        self.base
            .update_one(
                doc! { "telegram_id": telegram_id },
                doc! {
                    "$set": {
                        "activity": bson::to_bson(&activity)?,
                    }
                },
            )
            .await
    }
}
