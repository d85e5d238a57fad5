use gatekeeper_config::Settings;
use mongodb::{Client, Database, options::ClientOptions};
use tracing::info;

/// Opens the gatekeeper database and fails fast if the deployment is
/// unreachable. Pool bounds from settings take precedence over any
/// carried in the connection string.
pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&settings.database.url).await?;
    options.app_name = Some("gatekeeper".to_string());
    options.max_pool_size = settings.database.max_pool_size.or(options.max_pool_size);
    options.min_pool_size = settings.database.min_pool_size.or(options.min_pool_size);

    let db = Client::with_options(options)?.database(&settings.database.name);
    db.run_command(bson::doc! { "ping": 1 }).await?;

    info!(db = %settings.database.name, "Connected to MongoDB");
    Ok(db)
}
