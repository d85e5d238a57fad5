use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::{AuthError, AuthService};

/// A minted invitation, ready to hand out through a side channel.
#[derive(Debug, Clone)]
pub struct InviteLink {
    pub url: String,
    pub invite_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Wraps invitation tokens into Telegram deep links for the bot's
/// `/start` entry point.
pub struct InviteService {
    auth: Arc<AuthService>,
    bot_username: String,
}

impl InviteService {
    pub fn new(auth: Arc<AuthService>, bot_username: String) -> Self {
        Self { auth, bot_username }
    }

    pub fn issue(&self) -> Result<InviteLink, AuthError> {
        let invite = self.auth.issue_invite()?;
        let url = format!("https://t.me/{}?start={}", self.bot_username, invite.token);
        Ok(InviteLink {
            url,
            invite_id: invite.invite_id,
            expires_at: invite.expires_at,
        })
    }
}
