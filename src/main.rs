use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use obatbot::bot;
use obatbot::catalog_search::CatalogSearchService;
use obatbot::catalog_store::{connect_with_retry, PgCatalogStore};
use obatbot::config::BotConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting catalog Telegram bot");

    // Load environment variables from .env file
    dotenv::dotenv().ok();
    let config = Arc::new(BotConfig::from_env()?);

    // Establish the bounded connection pool and probe it
    let pool = connect_with_retry(&config).await?;
    let store = Arc::new(PgCatalogStore::new(pool, config.query_timeout));
    let service = Arc::new(CatalogSearchService::new(store));

    let bot = Bot::new(config.bot_token.clone());

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let service = Arc::clone(&service);
            let config = Arc::clone(&config);
            move |bot: Bot, msg: Message| {
                let service = Arc::clone(&service);
                let config = Arc::clone(&config);
                async move { bot::message_handler(bot, msg, service, config).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let service = Arc::clone(&service);
            let config = Arc::clone(&config);
            move |bot: Bot, q: CallbackQuery| {
                let service = Arc::clone(&service);
                let config = Arc::clone(&config);
                async move { bot::callback_handler(bot, q, service, config).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
