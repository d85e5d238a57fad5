use std::sync::Arc;

use gatekeeper_db::models::ActivityState;
use tracing::{debug, error, info, warn};

use crate::dao::base::DaoResult;
use crate::store::{BotChatStore, IdentityStore};
use crate::telegram::{ChatMemberUpdated, ChatPlatform, MemberStatus, User};

/// A membership change observed on the platform, normalized from the two
/// update kinds (`my_chat_member` for the bot itself, `chat_member` for
/// everyone else).
#[derive(Debug, Clone)]
pub struct ChatMemberEvent {
    pub chat_id: i64,
    pub chat_title: String,
    pub subject: User,
    pub new_status: MemberStatus,
    pub is_self: bool,
}

impl ChatMemberEvent {
    pub fn from_update(update: &ChatMemberUpdated, bot_id: i64) -> Self {
        Self {
            chat_id: update.chat.id,
            chat_title: update.chat.title.clone().unwrap_or_default(),
            subject: update.new_chat_member.user.clone(),
            new_status: update.new_chat_member.status,
            is_self: update.new_chat_member.user.id == bot_id,
        }
    }
}

/// Event-driven enforcer of the verified-only membership invariant.
///
/// Stateless per event: each membership change is reconciled on its own,
/// with the record store as the only shared state. Platform calls (ban,
/// notifications) are fire-and-forget; their failures are logged, never
/// retried and never propagated.
pub struct AdmissionService {
    identities: Arc<dyn IdentityStore>,
    chats: Arc<dyn BotChatStore>,
    platform: Arc<dyn ChatPlatform>,
}

impl AdmissionService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        chats: Arc<dyn BotChatStore>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self {
            identities,
            chats,
            platform,
        }
    }

    pub async fn handle(&self, event: ChatMemberEvent) -> DaoResult<()> {
        if event.is_self {
            return self.handle_self(event).await;
        }

        match event.new_status {
            MemberStatus::Member => self.handle_user_join(event).await,
            MemberStatus::Left => self.handle_user_left(event).await,
            _ => Ok(()),
        }
    }

    /// The bot joined or left a chat: keep the governed-chat registry in
    /// sync.
    async fn handle_self(&self, event: ChatMemberEvent) -> DaoResult<()> {
        match event.new_status {
            MemberStatus::Member | MemberStatus::Administrator => {
                self.chats.upsert(event.chat_id, &event.chat_title).await?;
                info!(chat_id = event.chat_id, chat = %event.chat_title, "Bot joined chat");
            }
            MemberStatus::Left => {
                self.chats.remove(event.chat_id).await?;
                info!(chat_id = event.chat_id, chat = %event.chat_title, "Bot left chat");
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_user_join(&self, event: ChatMemberEvent) -> DaoResult<()> {
        let subject = &event.subject;
        let identity = self.identities.find_by_telegram_id(subject.id).await?;

        let verified = identity.as_ref().is_some_and(|i| i.is_verified());
        if !verified {
            // Best effort: the user may never have opened the bot, in
            // which case Telegram refuses the DM. Enforcement does not
            // depend on the notification landing.
            if let Err(e) = self
                .platform
                .send_direct(
                    subject.id,
                    "🚫 You were removed because your account is not verified. Please verify it first.",
                )
                .await
            {
                debug!(user_id = subject.id, error = %e, "Unverified-join notice not delivered");
            }

            if let Err(e) = self.platform.ban_member(event.chat_id, subject.id).await {
                error!(
                    chat_id = event.chat_id,
                    user_id = subject.id,
                    error = %e,
                    "Failed to ban unverified member"
                );
            } else {
                info!(
                    chat_id = event.chat_id,
                    user_id = subject.id,
                    "Banned unverified member"
                );
            }
            return Ok(());
        }

        self.identities
            .set_activity(subject.id, ActivityState::Active)
            .await?;

        let name = subject.first_name.as_deref().unwrap_or("there");
        let welcome = format!("👋 Welcome to {}, {}!", event.chat_title, name);
        if let Err(e) = self.platform.send_direct(subject.id, &welcome).await {
            warn!(user_id = subject.id, error = %e, "Welcome message not delivered");
        }

        Ok(())
    }

    async fn handle_user_left(&self, event: ChatMemberEvent) -> DaoResult<()> {
        self.identities
            .set_activity(event.subject.id, ActivityState::Inactive)
            .await?;
        debug!(user_id = event.subject.id, "Member left, marked inactive");
        Ok(())
    }
}
