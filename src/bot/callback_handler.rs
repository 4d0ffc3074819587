//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::{debug, error};

use super::callback_data::CallbackData;
use super::ui_builder::{catalog_keyboard, catalog_page_body};
use super::{GENERIC_FAILURE_MESSAGE, NO_PRODUCTS_MESSAGE, PRODUCT_NOT_FOUND_MESSAGE};
use crate::catalog_search::CatalogSearchService;
use crate::catalog_store::PgCatalogStore;
use crate::config::BotConfig;
use crate::formatting::{chunk_message, MAX_MESSAGE_LEN};
use crate::product_model::ProductDetail;

/// Handle callback queries from the catalog keyboards.
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    service: Arc<CatalogSearchService<PgCatalogStore>>,
    config: Arc<BotConfig>,
) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query");

    if let Err(e) = handle_callback(&bot, &q, &service, &config).await {
        error!(user_id = %q.from.id, error = %e, "Callback handling failed");
        if let Some(msg) = &q.message {
            let _ = bot
                .send_message(msg.chat().id, GENERIC_FAILURE_MESSAGE)
                .await;
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;
    Ok(())
}

async fn handle_callback(
    bot: &Bot,
    q: &CallbackQuery,
    service: &CatalogSearchService<PgCatalogStore>,
    config: &BotConfig,
) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    let Some(msg) = &q.message else {
        debug!(user_id = %q.from.id, "Callback without originating message");
        return Ok(());
    };
    let chat_id = msg.chat().id;

    match CallbackData::parse(data) {
        Some(CallbackData::Page(args)) => {
            // Pagination edits the existing listing message in place
            let outcome = service
                .list_page(&args.query, &args.category, args.page, config.page_size)
                .await;

            let rows = outcome.rows();
            if rows.is_empty() {
                bot.edit_message_text(chat_id, msg.id(), NO_PRODUCTS_MESSAGE)
                    .await?;
            } else {
                let body = catalog_page_body(&args, rows, config.page_size);
                let keyboard = catalog_keyboard(&args, rows, outcome.total(), config.page_size);
                bot.edit_message_text(chat_id, msg.id(), body)
                    .reply_markup(keyboard)
                    .await?;
            }
        }
        Some(CallbackData::Product { id }) => {
            send_product_detail(bot, chat_id, id, service).await?;
        }
        Some(CallbackData::Noop) => {}
        None => {
            debug!(data, "Ignoring unknown callback token");
        }
    }

    Ok(())
}

/// Send the detail view for one product id.
///
/// A missing id answers "not found"; a store failure answers the generic
/// failure message instead, keeping the two outcomes distinguishable.
async fn send_product_detail(
    bot: &Bot,
    chat_id: ChatId,
    id: i64,
    service: &CatalogSearchService<PgCatalogStore>,
) -> Result<()> {
    let detail = match service.product_detail(id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            bot.send_message(chat_id, PRODUCT_NOT_FOUND_MESSAGE).await?;
            return Ok(());
        }
        Err(e) => {
            error!(error = %e, product_id = id, "Detail lookup failed");
            bot.send_message(chat_id, GENERIC_FAILURE_MESSAGE).await?;
            return Ok(());
        }
    };

    send_detail_messages(bot, chat_id, &detail).await
}

async fn send_detail_messages(bot: &Bot, chat_id: ChatId, detail: &ProductDetail) -> Result<()> {
    let caption = detail.caption();
    let long_text = detail.long_text();

    let photo_url = detail
        .image_url
        .as_deref()
        .and_then(|raw| reqwest::Url::parse(raw).ok());

    if let Some(url) = photo_url {
        bot.send_photo(chat_id, InputFile::url(url))
            .caption(caption)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        if !long_text.is_empty() {
            send_long_message(bot, chat_id, &long_text).await?;
        }
    } else {
        let combined = if long_text.is_empty() {
            caption
        } else {
            format!("{caption}\n\n{long_text}")
        };
        send_long_message(bot, chat_id, &combined).await?;
    }

    Ok(())
}

async fn send_long_message(bot: &Bot, chat_id: ChatId, text: &str) -> Result<()> {
    for chunk in chunk_message(text, MAX_MESSAGE_LEN) {
        bot.send_message(chat_id, chunk)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
    }
    Ok(())
}
