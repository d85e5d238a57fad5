use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub invite: String,
}

/// Mints a fresh time-boxed invitation and wraps it into a bot deep link.
/// Stateless: nothing is recorded server-side per token.
pub async fn generate_invite(
    State(state): State<AppState>,
) -> Result<Json<InviteResponse>, ApiError> {
    let link = state.invites.issue()?;
    debug!(invite_id = %link.invite_id, expires_at = %link.expires_at, "Issued invite");

    Ok(Json(InviteResponse { invite: link.url }))
}
