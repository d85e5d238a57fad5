use axum::{Json, extract::State};
use gatekeeper_services::telegram::verify_init_data;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyWebAppRequest {
    pub telegram_user_id: i64,
    #[serde(rename = "inviteToken")]
    pub invite_token: String,
    #[serde(rename = "initData")]
    pub init_data: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyWebAppResponse {
    pub success: bool,
}

/// WebApp entry point: checks the invitation token (signature + expiry)
/// and the Telegram-signed `initData` payload, requires the claimed user
/// id to match the one Telegram signed, then confirms to the user over
/// DM. Confirmation delivery is best effort; validation alone decides the
/// outcome.
pub async fn verify_webapp(
    State(state): State<AppState>,
    Json(body): Json<VerifyWebAppRequest>,
) -> Json<VerifyWebAppResponse> {
    if let Err(e) = state.auth.verify_invite(&body.invite_token) {
        warn!(user_id = body.telegram_user_id, error = %e, "Invite token rejected");
        return Json(VerifyWebAppResponse { success: false });
    }

    let init_data = match verify_init_data(&body.init_data, &state.settings.telegram.bot_token) {
        Ok(data) => data,
        Err(e) => {
            warn!(user_id = body.telegram_user_id, error = %e, "initData rejected");
            return Json(VerifyWebAppResponse { success: false });
        }
    };

    // The DM target must be the user Telegram actually signed for, not
    // whatever id the caller claims.
    if init_data.user_id() != Some(body.telegram_user_id) {
        warn!(
            user_id = body.telegram_user_id,
            signed_user_id = ?init_data.user_id(),
            "initData user mismatch"
        );
        return Json(VerifyWebAppResponse { success: false });
    }

    if let Err(e) = state
        .platform
        .send_direct(
            body.telegram_user_id,
            "✅ Your invitation is confirmed. Welcome aboard!",
        )
        .await
    {
        debug!(user_id = body.telegram_user_id, error = %e, "Confirmation not delivered");
    }

    Json(VerifyWebAppResponse { success: true })
}
