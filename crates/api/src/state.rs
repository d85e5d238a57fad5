use std::sync::Arc;

use gatekeeper_config::Settings;
use gatekeeper_services::{
    AuthService, InviteService, TelegramClient,
    telegram::ChatPlatform,
};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub invites: Arc<InviteService>,
    pub platform: Arc<dyn ChatPlatform>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let invites = Arc::new(InviteService::new(
            auth.clone(),
            settings.telegram.bot_username.clone(),
        ));
        let platform = Arc::new(TelegramClient::new(&settings.telegram));
        Self::from_parts(settings, auth, invites, platform)
    }

    /// Assembles state from pre-built collaborators; used by tests to
    /// substitute a fake platform.
    pub fn from_parts(
        settings: Settings,
        auth: Arc<AuthService>,
        invites: Arc<InviteService>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self {
            settings,
            auth,
            invites,
            platform,
        }
    }
}
