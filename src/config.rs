//! # Bot Configuration Module
//!
//! This module defines the runtime configuration for the catalog bot,
//! loaded once at startup from environment variables.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::env;
use std::time::Duration;

// Constants for catalog behavior
pub const DEFAULT_PAGE_SIZE: i64 = 5;
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.30;
pub const DEFAULT_VACCINE_CATEGORY: &str = "vaccine";
pub const MAX_PRICE_RESULTS: usize = 5;

// Constants for the connection pool
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 10;

/// Configuration structure for the catalog bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Postgres connection string
    pub database_url: String,
    /// Telegram user IDs allowed to talk to the bot; empty set means open access
    pub allowed_ids: HashSet<u64>,
    /// Number of catalog rows per page
    pub page_size: i64,
    /// Minimum trigram similarity score for the fuzzy price lookup
    pub similarity_threshold: f32,
    /// Category value bound to the /vaksin shortcut
    pub vaccine_category: String,
    /// Minimum number of pooled connections kept open
    pub min_connections: u32,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Upper bound for a single row-store round trip
    pub query_timeout: Duration,
}

impl BotConfig {
    /// Load the configuration from environment variables.
    ///
    /// `TELEGRAM_BOT_TOKEN` and `DATABASE_URL` are required; everything else
    /// falls back to the defaults above. `ALLOWED_TELEGRAM_IDS` is a
    /// comma-separated list of numeric Telegram user IDs.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let allowed_ids = parse_allowed_ids(&env::var("ALLOWED_TELEGRAM_IDS").unwrap_or_default());

        let page_size = env::var("PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let similarity_threshold = env::var("SIMILARITY_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| (0.0..=1.0).contains(v))
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);

        let vaccine_category = env::var("VACCINE_CATEGORY")
            .unwrap_or_else(|_| DEFAULT_VACCINE_CATEGORY.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MIN_CONNECTIONS);

        let query_timeout_secs = env::var("DB_QUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);

        Ok(Self {
            bot_token,
            database_url,
            allowed_ids,
            page_size,
            similarity_threshold,
            vaccine_category,
            min_connections: min_connections.min(max_connections),
            max_connections,
            query_timeout: Duration::from_secs(query_timeout_secs),
        })
    }

    /// Whether the given Telegram user may use the bot.
    pub fn is_allowed(&self, user_id: u64) -> bool {
        self.allowed_ids.is_empty() || self.allowed_ids.contains(&user_id)
    }
}

fn parse_allowed_ids(raw: &str) -> HashSet<u64> {
    raw.split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                None
            } else {
                part.parse().ok()
            }
        })
        .collect()
}
