use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A chat the bot currently governs. Created when the bot is added as
/// member or administrator, removed when it leaves. This registry is the
/// authoritative list of chats under verified-only enforcement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotChat {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub chat_id: i64,
    pub chat_name: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl BotChat {
    pub const COLLECTION: &'static str = "bot_chats";
}
