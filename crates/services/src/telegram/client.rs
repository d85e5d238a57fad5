use std::time::Duration;

use async_trait::async_trait;
use gatekeeper_config::TelegramSettings;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use super::types::Update;

#[derive(Debug, Error)]
pub enum TelegramError {
    /// The Bot API answered with `ok: false`.
    #[error("Telegram API error: {0}")]
    Api(String),
    /// Transport failure, including a hit request timeout.
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotProfile {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Every Bot API response wraps its payload in this envelope. Missing
/// `result`/`description` fields deserialize as `None` without extra
/// bounds on `T`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// Member-management seam consumed by the admission reconciler and the
/// admin gateway. Production uses [`TelegramClient`]; tests substitute a
/// recording fake.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError>;

    async fn send_direct(&self, user_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Exports a fresh primary invite link for the chat, revoking the
    /// previous one.
    async fn rotate_invite_link(&self, chat_id: i64) -> Result<String, TelegramError>;
}

pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    request_timeout: Duration,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(settings: &TelegramSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            bot_token: settings.bot_token.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            poll_timeout: Duration::from_secs(settings.poll_timeout_secs),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    /// Posts a method call and unwraps the response envelope. Error
    /// payloads come back with non-2xx statuses but still carry the JSON
    /// envelope, so the body is parsed regardless of status.
    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: &serde_json::Value,
        timeout: Duration,
    ) -> Result<R, TelegramError> {
        let resp = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(params)
            .send()
            .await?;

        let envelope: ApiEnvelope<R> = resp.json().await?;
        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Api("missing result".to_string()))
    }

    pub async fn get_me(&self) -> Result<BotProfile, TelegramError> {
        self.call("getMe", &serde_json::json!({}), self.request_timeout)
            .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.call::<serde_json::Value>(
            "sendMessage",
            &serde_json::json!({ "chat_id": chat_id, "text": text }),
            self.request_timeout,
        )
        .await?;
        Ok(())
    }

    pub async fn send_message_with_markup(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: serde_json::Value,
    ) -> Result<(), TelegramError> {
        self.call::<serde_json::Value>(
            "sendMessage",
            &serde_json::json!({
                "chat_id": chat_id,
                "text": text,
                "reply_markup": reply_markup,
            }),
            self.request_timeout,
        )
        .await?;
        Ok(())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TelegramError> {
        self.call::<serde_json::Value>(
            "editMessageText",
            &serde_json::json!({
                "chat_id": chat_id,
                "message_id": message_id,
                "text": text,
            }),
            self.request_timeout,
        )
        .await?;
        Ok(())
    }

    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.call::<serde_json::Value>(
            "answerCallbackQuery",
            &serde_json::json!({ "callback_query_id": callback_id }),
            self.request_timeout,
        )
        .await?;
        Ok(())
    }

    /// Long-polls for updates. The HTTP timeout is padded past the poll
    /// window so the server side can close the poll first.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let mut params = serde_json::json!({
            "timeout": self.poll_timeout.as_secs(),
            "allowed_updates": ["message", "callback_query", "chat_member", "my_chat_member"],
        });
        if let Some(offset) = offset {
            params["offset"] = serde_json::json!(offset);
        }

        self.call("getUpdates", &params, self.poll_timeout + Duration::from_secs(10))
            .await
    }
}

#[async_trait]
impl ChatPlatform for TelegramClient {
    async fn ban_member(&self, chat_id: i64, user_id: i64) -> Result<(), TelegramError> {
        self.call::<serde_json::Value>(
            "banChatMember",
            &serde_json::json!({ "chat_id": chat_id, "user_id": user_id }),
            self.request_timeout,
        )
        .await?;
        Ok(())
    }

    async fn send_direct(&self, user_id: i64, text: &str) -> Result<(), TelegramError> {
        self.send_message(user_id, text).await
    }

    async fn rotate_invite_link(&self, chat_id: i64) -> Result<String, TelegramError> {
        self.call(
            "exportChatInviteLink",
            &serde_json::json!({ "chat_id": chat_id }),
            self.request_timeout,
        )
        .await
    }
}
