mod dispatcher;
mod lessons;

use std::sync::Arc;
use std::time::Duration;

use gatekeeper_config::Settings;
use gatekeeper_db::{connect, indexes::ensure_indexes};
use gatekeeper_services::{
    AdmissionService, TelegramClient, VerificationService,
    dao::{bot_chat::BotChatDao, identity::IdentityDao},
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dispatcher::Dispatcher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "gatekeeper_bot=debug,gatekeeper_services=debug,gatekeeper_db=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;

    // Connect to MongoDB
    let db = connect(&settings).await?;

    // Ensure indexes
    ensure_indexes(&db).await?;

    // Process-wide collaborators, constructed once and shared.
    let identities = Arc::new(IdentityDao::new(&db));
    let chats = Arc::new(BotChatDao::new(&db));
    let client = Arc::new(TelegramClient::new(&settings.telegram));

    let me = client.get_me().await?;
    info!(bot_id = me.id, username = ?me.username, "Bot identity resolved");

    let verification = Arc::new(VerificationService::new(
        identities.clone(),
        Duration::from_secs(settings.verification.session_idle_secs),
    ));
    let admission = Arc::new(AdmissionService::new(
        identities.clone(),
        chats.clone(),
        client.clone(),
    ));

    // Periodic sweep of idle verification conversations
    let sweeper = verification.clone();
    let sweep_every = Duration::from_secs(settings.verification.sweep_interval_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            sweeper.purge_idle();
        }
    });

    let dispatcher = Dispatcher::new(client, verification, admission, me.id);
    dispatcher.run().await
}
