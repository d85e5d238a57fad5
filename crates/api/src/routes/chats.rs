use axum::{Json, extract::State};
use gatekeeper_services::telegram::TelegramError;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::ApiError, extractors::auth::AdminUser, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ChatActionRequest {
    pub chat_id: i64,
    pub telegram_user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ChatActionResponse {
    pub ok: bool,
    pub message: String,
}

/// Kicks a member out of a chat via the ban primitive. A non-success
/// platform response becomes a structured failure carrying the platform's
/// own description.
pub async fn remove_user(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<ChatActionRequest>,
) -> Result<Json<ChatActionResponse>, ApiError> {
    info!(
        admin = %admin.subject,
        chat_id = body.chat_id,
        user_id = body.telegram_user_id,
        "Admin remove-user"
    );

    match state
        .platform
        .ban_member(body.chat_id, body.telegram_user_id)
        .await
    {
        Ok(()) => Ok(Json(ChatActionResponse {
            ok: true,
            message: "User removed successfully".to_string(),
        })),
        Err(TelegramError::Api(description)) => Ok(Json(ChatActionResponse {
            ok: false,
            message: description,
        })),
        Err(e) => Ok(Json(ChatActionResponse {
            ok: false,
            message: e.to_string(),
        })),
    }
}

/// Two-step invitation: rotate the chat's invite link, then DM it to the
/// user. A rotation failure short-circuits; a delivery failure after a
/// successful rotation is reported distinctly.
pub async fn sent_invitation(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(body): Json<ChatActionRequest>,
) -> Result<Json<ChatActionResponse>, ApiError> {
    info!(
        admin = %admin.subject,
        chat_id = body.chat_id,
        user_id = body.telegram_user_id,
        "Admin sent-invitation"
    );

    let link = match state.platform.rotate_invite_link(body.chat_id).await {
        Ok(link) => link,
        Err(e) => {
            warn!(chat_id = body.chat_id, error = %e, "Invite link rotation failed");
            return Ok(Json(ChatActionResponse {
                ok: false,
                message: format!("Failed to create invite link: {e}"),
            }));
        }
    };

    match state
        .platform
        .send_direct(
            body.telegram_user_id,
            &format!("📨 You are invited to join:\n{link}"),
        )
        .await
    {
        Ok(()) => Ok(Json(ChatActionResponse {
            ok: true,
            message: "Invitation sent".to_string(),
        })),
        Err(e) => Ok(Json(ChatActionResponse {
            ok: false,
            message: format!("Invite link created but delivery failed: {e}"),
        })),
    }
}
