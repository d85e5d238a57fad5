use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A managed member record: links a claimed external identifier to its
/// verification state and, once verified, to a Telegram account.
///
/// Rows are provisioned externally in `Pending` state with a known
/// activation code. `telegram_id` is set if and only if the identity is
/// `Verified`; this core never deletes identities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub external_id: String,
    pub activation_code: String,
    #[serde(default)]
    pub status: IdentityStatus,
    pub telegram_id: Option<i64>,
    pub telegram_name: Option<String>,
    pub invite_link: Option<String>,
    #[serde(default)]
    pub activity: ActivityState,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStatus {
    #[default]
    Pending,
    Verified,
}

/// Current chat presence, maintained by the admission reconciler.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    /// Never seen joining or leaving a governed chat.
    #[default]
    Unknown,
    Active,
    Inactive,
}

impl Identity {
    pub const COLLECTION: &'static str = "identities";

    pub fn is_verified(&self) -> bool {
        self.status == IdentityStatus::Verified
    }
}
