use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Identities
    create_indexes(
        db,
        "identities",
        vec![
            index_unique(bson::doc! { "external_id": 1 }),
            index(bson::doc! { "telegram_id": 1 }),
            index(bson::doc! { "status": 1 }),
        ],
    )
    .await?;

    // Chats the bot governs
    create_indexes(
        db,
        "bot_chats",
        vec![index_unique(bson::doc! { "chat_id": 1 })],
    )
    .await?;

    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
