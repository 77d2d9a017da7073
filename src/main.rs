//! Entry point: wires configuration, the document store, and the Telegram
//! dispatcher together.

use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sozdik_bot::bot::{callback_handler, message_handler, BotConfig};
use sozdik_bot::dialogue::FlowState;
use sozdik_bot::store::{MemoryStore, MongoStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sozdik_bot=info,teloxide=warn")),
        )
        .init();

    let token = std::env::var("TELOXIDE_TOKEN").context("TELOXIDE_TOKEN is not set")?;
    let bot = Bot::new(token);

    let store = Arc::new(build_store().await?);
    let config = Arc::new(BotConfig {
        admin_ids: parse_admin_ids(&std::env::var("ADMIN_IDS").unwrap_or_default()),
    });
    if config.admin_ids.is_empty() {
        info!("ADMIN_IDS is empty, /add_word is disabled for everyone");
    }

    info!("Starting dictionary bot");

    let handler = dialogue::enter::<Update, InMemStorage<FlowState>, FlowState, _>()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            InMemStorage::<FlowState>::new(),
            store,
            config
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// MongoDB when `MONGO_URI` is set, otherwise an in-memory dictionary
/// loaded from a flat file.
async fn build_store() -> Result<Store> {
    if let Ok(uri) = std::env::var("MONGO_URI") {
        let db_name = std::env::var("MONGO_DB").unwrap_or_else(|_| "sozdik".to_string());
        info!(db = %db_name, "Connecting to MongoDB");
        let mongo = MongoStore::connect(&uri, &db_name)
            .await
            .context("MongoDB connection failed")?;
        return Ok(Store::Mongo(mongo));
    }

    let path = std::env::var("DICT_FILE").unwrap_or_else(|_| "./dictionary.txt".to_string());
    info!(path = %path, "MONGO_URI not set, loading flat-file dictionary");
    let memory = MemoryStore::from_flat_file(&path)
        .with_context(|| format!("failed to load dictionary from {}", path))?;
    Ok(Store::Memory(memory))
}

/// Comma-separated Telegram user ids; malformed entries are skipped.
fn parse_admin_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}
