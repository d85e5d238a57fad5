use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use gatekeeper_db::models::Identity;
use tracing::{debug, info};

use crate::dao::base::DaoResult;
use crate::store::IdentityStore;
use crate::telegram::User;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ConversationState {
    AwaitingExternalId,
    AwaitingPin,
}

#[derive(Clone)]
struct Session {
    state: ConversationState,
    claimed_external_id: Option<String>,
    /// Identity fetched at claim time. Kept for context only; the PIN
    /// check always re-fetches so it compares against the latest
    /// persisted activation code.
    snapshot: Option<Identity>,
    last_active: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            state: ConversationState::AwaitingExternalId,
            claimed_external_id: None,
            snapshot: None,
            last_active: Instant::now(),
        }
    }
}

/// Multi-turn verification conversation, one session per initiating
/// Telegram user. Any terminal transition (success, cancellation, lookup
/// failure, wrong PIN) discards the session; a wrong PIN requires the user
/// to start over with `/start`.
pub struct VerificationService {
    identities: Arc<dyn IdentityStore>,
    sessions: DashMap<i64, Session>,
    idle_timeout: Duration,
}

impl VerificationService {
    pub fn new(identities: Arc<dyn IdentityStore>, idle_timeout: Duration) -> Self {
        Self {
            identities,
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    /// `/start`: opens (or restarts) a conversation for this user.
    pub fn start(&self, user_id: i64) -> String {
        self.sessions.insert(user_id, Session::new());
        "Please provide your user ID:".to_string()
    }

    /// `/cancel`: ends the conversation in any state.
    pub fn cancel(&self, user_id: i64) -> String {
        self.sessions.remove(&user_id);
        "❌ Verification cancelled.".to_string()
    }

    /// Feeds a free-text reply into the sender's conversation. Returns
    /// `None` when the sender has no open conversation.
    pub async fn handle_text(&self, sender: &User, text: &str) -> DaoResult<Option<String>> {
        let Some(session) = self.sessions.get(&sender.id).map(|s| s.clone()) else {
            return Ok(None);
        };

        let result = match session.state {
            ConversationState::AwaitingExternalId => {
                self.handle_external_id(sender.id, text.trim()).await
            }
            // The PIN is compared verbatim: no trimming, exact string
            // equality against the stored activation code.
            ConversationState::AwaitingPin => self.handle_pin(sender, &session, text).await,
        };

        // A store failure is terminal for the conversation too.
        if result.is_err() {
            self.sessions.remove(&sender.id);
        }

        result.map(Some)
    }

    async fn handle_external_id(&self, user_id: i64, claimed: &str) -> DaoResult<String> {
        let identity = self.identities.find_by_external_id(claimed).await?;

        let Some(identity) = identity else {
            self.sessions.remove(&user_id);
            return Ok("❌ Unknown user ID.".to_string());
        };

        if identity.is_verified() {
            self.sessions.remove(&user_id);
            return Ok("✅ This user ID is already verified.".to_string());
        }

        self.sessions.insert(
            user_id,
            Session {
                state: ConversationState::AwaitingPin,
                claimed_external_id: Some(claimed.to_string()),
                snapshot: Some(identity),
                last_active: Instant::now(),
            },
        );

        Ok("Please provide your PIN:".to_string())
    }

    async fn handle_pin(&self, sender: &User, session: &Session, pin: &str) -> DaoResult<String> {
        // Terminal either way: success, mismatch or not-found all end the
        // conversation.
        self.sessions.remove(&sender.id);

        let Some(claimed) = session.claimed_external_id.as_deref() else {
            return Ok("❌ Verification failed, please start over.".to_string());
        };

        // Re-fetch rather than trusting the snapshot: the record may have
        // changed between the two turns (e.g. concurrent admin edits).
        let identity = self.identities.find_by_external_id(claimed).await?;
        let Some(identity) = identity else {
            return Ok("❌ User not found.".to_string());
        };

        if let Some(snapshot) = &session.snapshot {
            if snapshot.activation_code != identity.activation_code {
                debug!(external_id = claimed, "Activation code changed between turns");
            }
        }

        if identity.activation_code != pin {
            debug!(external_id = claimed, "PIN mismatch");
            return Ok("❌ Invalid PIN.".to_string());
        }

        self.identities
            .mark_verified(claimed, sender.id, sender.username.as_deref())
            .await?;

        info!(
            external_id = claimed,
            telegram_id = sender.id,
            "Identity verified"
        );

        Ok(match identity.invite_link {
            Some(link) => format!("✅ Verified! Here is your chat invite link:\n{link}"),
            None => "✅ Verified!".to_string(),
        })
    }

    /// Drops conversations idle past the configured timeout. Returns the
    /// number of sessions removed. Removals are counted inside the sweep
    /// itself, so sessions opened concurrently do not skew the count.
    pub fn purge_idle(&self) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let keep = session.last_active.elapsed() < self.idle_timeout;
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            debug!(removed, "Purged idle verification sessions");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
