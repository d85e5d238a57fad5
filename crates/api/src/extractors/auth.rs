use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use gatekeeper_services::auth::AdminClaims;

use crate::{error::ApiError, state::AppState};

/// Extracts and verifies the admin bearer token. Rejections are distinct
/// per failure kind: expired, invalid, or wrong role. The guarded action
/// is never reached on rejection.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub subject: String,
    pub claims: AdminClaims,
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::TokenInvalid("No bearer token provided".to_string()))?;

        let claims = state.auth.verify_admin_token(token)?;

        Ok(AdminUser {
            subject: claims.sub.clone(),
            claims,
        })
    }
}
