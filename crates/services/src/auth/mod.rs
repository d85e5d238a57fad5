use chrono::{DateTime, Duration, Utc};
use gatekeeper_config::JwtSettings;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Forbidden")]
    Forbidden,
}

/// Claims carried by an admin bearer token. The gateway only honors
/// tokens whose `role` claim is `admin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Claims carried by an invitation token. Stateless: validity is entirely
/// signature + expiry, no per-token server record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteClaims {
    pub invite_id: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct IssuedInvite {
    pub token: String,
    pub invite_id: String,
    pub expires_at: DateTime<Utc>,
}

pub const ADMIN_ROLE: &str = "admin";

pub struct AuthService {
    jwt_settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(jwt_settings: JwtSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(jwt_settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(jwt_settings.secret.as_bytes());
        Self {
            jwt_settings,
            encoding_key,
            decoding_key,
        }
    }

    /// Mints a fresh invitation token. Each call yields a distinct token;
    /// the invite id carries 64 bits of randomness, hex encoded.
    pub fn issue_invite(&self) -> Result<IssuedInvite, AuthError> {
        let mut bytes = [0u8; 8];
        rand::rng().fill_bytes(&mut bytes);
        let invite_id = hex::encode(bytes);

        let now = Utc::now();
        let expires_at = now + Duration::seconds(self.jwt_settings.invite_ttl_secs as i64);

        let claims = InviteClaims {
            invite_id: invite_id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.jwt_settings.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(IssuedInvite {
            token,
            invite_id,
            expires_at,
        })
    }

    pub fn verify_invite(&self, token: &str) -> Result<InviteClaims, AuthError> {
        let token_data = decode::<InviteClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(token_data.claims)
    }

    pub fn issue_admin_token(&self, sub: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AdminClaims {
            sub: sub.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.jwt_settings.admin_token_ttl_secs as i64))
                .timestamp(),
            iss: self.jwt_settings.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verifies signature, expiry and the embedded role claim. Each
    /// failure mode is distinct so callers can reject precisely.
    pub fn verify_admin_token(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let token_data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        if token_data.claims.role != ADMIN_ROLE {
            return Err(AuthError::Forbidden);
        }

        Ok(token_data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.jwt_settings.issuer]);
        validation
    }
}
