//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error, warn};

use super::ui_builder::{catalog_keyboard, catalog_page_body};
use super::{
    ACCESS_RESTRICTED_MESSAGE, GENERIC_FAILURE_MESSAGE, HELP_MESSAGE, NO_PRODUCTS_MESSAGE,
    PRICE_NOT_FOUND_MESSAGE,
};
use crate::catalog_search::CatalogSearchService;
use crate::catalog_store::PgCatalogStore;
use crate::command_parser::{parse_command, CatalogArgs, Command};
use crate::config::BotConfig;
use crate::formatting::rupiah;

/// Top-level message entry point.
///
/// Internal failures are logged and answered with a generic apology; they
/// never propagate into the dispatcher.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    service: Arc<CatalogSearchService<PgCatalogStore>>,
    config: Arc<BotConfig>,
) -> Result<()> {
    if let Err(e) = handle_message(&bot, &msg, &service, &config).await {
        error!(chat_id = %msg.chat.id, error = %e, "Message handling failed");
        let _ = bot.send_message(msg.chat.id, GENERIC_FAILURE_MESSAGE).await;
    }
    Ok(())
}

async fn handle_message(
    bot: &Bot,
    msg: &Message,
    service: &CatalogSearchService<PgCatalogStore>,
    config: &BotConfig,
) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = %msg.chat.id, "Ignoring non-text message");
        return Ok(());
    };

    let sender = msg.from.as_ref().map(|user| user.id.0);
    let allowed = match sender {
        Some(user_id) => config.is_allowed(user_id),
        // Messages without a sender (e.g. channel posts) only pass when
        // the allow-list is open
        None => config.allowed_ids.is_empty(),
    };
    if !allowed {
        warn!(user_id = ?sender, "Rejected sender not on the allow-list");
        bot.send_message(msg.chat.id, ACCESS_RESTRICTED_MESSAGE)
            .await?;
        return Ok(());
    }

    match parse_command(text) {
        Command::Produk(args) => {
            debug!(user_id = ?sender, ?args, "Handling /produk");
            send_catalog(bot, msg.chat.id, &args, service, config).await
        }
        Command::Vaksin { query, page } => {
            debug!(user_id = ?sender, query = %query, page, "Handling /vaksin");
            let args = CatalogArgs {
                query,
                category: config.vaccine_category.clone(),
                page,
            };
            send_catalog(bot, msg.chat.id, &args, service, config).await
        }
        Command::Harga { name, pack } => {
            debug!(user_id = ?sender, name = %name, pack = %pack, "Handling /harga");
            send_price_lookup(bot, msg.chat.id, &name, &pack, service, config).await
        }
        Command::Help => {
            bot.send_message(msg.chat.id, HELP_MESSAGE).await?;
            Ok(())
        }
    }
}

/// Send one catalog page with detail buttons and pagination controls.
async fn send_catalog(
    bot: &Bot,
    chat_id: ChatId,
    args: &CatalogArgs,
    service: &CatalogSearchService<PgCatalogStore>,
    config: &BotConfig,
) -> Result<()> {
    let outcome = service
        .list_page(&args.query, &args.category, args.page, config.page_size)
        .await;

    let rows = outcome.rows();
    if rows.is_empty() {
        bot.send_message(chat_id, NO_PRODUCTS_MESSAGE).await?;
        return Ok(());
    }

    let body = catalog_page_body(args, rows, config.page_size);
    let keyboard = catalog_keyboard(args, rows, outcome.total(), config.page_size);
    bot.send_message(chat_id, body)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Answer a /harga lookup with up to five bulleted price lines.
async fn send_price_lookup(
    bot: &Bot,
    chat_id: ChatId,
    name: &str,
    pack: &str,
    service: &CatalogSearchService<PgCatalogStore>,
    config: &BotConfig,
) -> Result<()> {
    let quotes = service
        .find_prices(name, pack, config.similarity_threshold)
        .await;

    if quotes.is_empty() {
        bot.send_message(chat_id, PRICE_NOT_FOUND_MESSAGE).await?;
        return Ok(());
    }

    let lines: Vec<String> = quotes
        .iter()
        .map(|q| format!("• {} — {}: {}", q.name, q.pack, rupiah(q.price)))
        .collect();
    bot.send_message(chat_id, lines.join("\n")).await?;
    Ok(())
}
