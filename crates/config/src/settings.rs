use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub telegram: TelegramSettings,
    pub verification: VerificationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    /// Lifetime of an invitation token.
    pub invite_ttl_secs: u64,
    /// Lifetime of an admin bearer token.
    pub admin_token_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramSettings {
    pub bot_token: String,
    /// Public @username of the bot, used to build deep links.
    pub bot_username: String,
    /// Base URL of the Bot API; overridable so tests can point at a stub.
    pub api_base: String,
    /// Timeout applied to regular outbound Bot API calls.
    pub request_timeout_secs: u64,
    /// Long-poll window passed to getUpdates.
    pub poll_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VerificationSettings {
    /// Conversations idle longer than this are dropped.
    pub session_idle_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("GATEKEEPER"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "gatekeeper")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.issuer", "gatekeeper")?
            .set_default("jwt.invite_ttl_secs", 86400)?
            .set_default("jwt.admin_token_ttl_secs", 3600)?
            .set_default("telegram.bot_token", "")?
            .set_default("telegram.bot_username", "")?
            .set_default("telegram.api_base", "https://api.telegram.org")?
            .set_default("telegram.request_timeout_secs", 5)?
            .set_default("telegram.poll_timeout_secs", 30)?
            .set_default("verification.session_idle_secs", 900)?
            .set_default("verification.sweep_interval_secs", 60)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
