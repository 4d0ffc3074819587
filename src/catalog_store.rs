//! # Catalog Store Module
//!
//! The row-store boundary of the bot: a [`CatalogStore`] trait the search
//! service talks to, and its Postgres implementation backed by a bounded
//! sqlx connection pool.
//!
//! All SQL is parameterized; user input is only ever bound, never spliced
//! into the query text. The fuzzy lookup relies on the `pg_trgm`
//! `similarity()` function, which may be missing on a given database; its
//! failure is reported as an ordinary [`StoreError`] and handled by the
//! service layer.

use async_trait::async_trait;
use rand::Rng;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::product_model::{PriceQuote, Product, ProductSummary};

// Constants for pool establishment
pub const MAX_CONNECT_ATTEMPTS: u32 = 5;
pub const BASE_RETRY_DELAY_MS: u64 = 500;
pub const MAX_RETRY_DELAY_MS: u64 = 10_000;
pub const RETRY_JITTER_MS: u64 = 250;

const SQL_LIST_PRODUCTS: &str = r#"
select id::bigint               as id,
       "nama"                   as name,
       coalesce("kemasan", '')  as pack,
       price::bigint            as price,
       coalesce("Kategori", '')    as category,
       coalesce("Sub-kategor", '') as subcategory
from "DataObat"
where ($1 = '' or lower("nama") ilike '%'||lower($1)||'%')
  and ($2 = '' or lower("Kategori") = lower($2))
order by lower("nama"), "kemasan"
limit $3 offset $4
"#;

const SQL_COUNT_PRODUCTS: &str = r#"
select count(*)::bigint
from "DataObat"
where ($1 = '' or lower("nama") ilike '%'||lower($1)||'%')
  and ($2 = '' or lower("Kategori") = lower($2))
"#;

const SQL_PRODUCT_DETAIL: &str = r#"
select id::bigint      as id,
       "SKU"           as sku,
       "nama"          as name,
       "kemasan"       as pack,
       price::bigint   as price,
       "Kategori"      as category,
       "Sub-kategor"   as subcategory,
       "Fungsi"        as "function",
       "Deskripsi"     as description,
       "Indikasi"      as indications,
       "Aturan paka"   as dosage,
       "URL"           as url,
       "Image URL"     as image_url
from "DataObat"
where id = $1
"#;

const SQL_LOOKUP_FUZZY: &str = r#"
select "nama"                  as name,
       coalesce("kemasan", '') as pack,
       price::bigint           as price
from "DataObat"
where similarity("nama", $1) >= $3
  and ($2 = '' or "kemasan" ilike '%'||$2||'%')
order by similarity("nama", $1) desc, "nama"
limit 5
"#;

const SQL_LOOKUP_SUBSTRING: &str = r#"
select "nama"                  as name,
       coalesce("kemasan", '') as pack,
       price::bigint           as price
from "DataObat"
where ("nama" ilike '%'||$1||'%' or "SKU" ilike '%'||$1||'%')
  and ($2 = '' or "kemasan" ilike '%'||$2||'%')
order by "nama", "kemasan"
limit 5
"#;

/// Error types for row-store operations
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The store could not be reached
    Connection(String),
    /// A query failed to execute
    Query(String),
    /// A round trip exceeded the configured deadline
    Timeout(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "Connection error: {msg}"),
            StoreError::Query(msg) => write!(f, "Query error: {msg}"),
            StoreError::Timeout(msg) => write!(f, "Timeout error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout(err.to_string()),
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Configuration(_) => {
                StoreError::Connection(err.to_string())
            }
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Query interface of the product catalog table.
///
/// The search service only depends on this trait, so tests can exercise it
/// against an in-memory implementation.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Count rows matching the listing filters, ignoring pagination.
    async fn count_products(&self, query: &str, category: &str) -> Result<i64, StoreError>;

    /// Fetch one page of the listing, sorted by lowercased name then pack.
    async fn list_products(
        &self,
        query: &str,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductSummary>, StoreError>;

    /// Trigram-similarity price lookup; errors when `pg_trgm` is missing.
    async fn lookup_similar(
        &self,
        name: &str,
        pack: &str,
        threshold: f32,
    ) -> Result<Vec<PriceQuote>, StoreError>;

    /// Substring price lookup over name and SKU.
    async fn lookup_substring(&self, name: &str, pack: &str)
        -> Result<Vec<PriceQuote>, StoreError>;

    /// Fetch the full record for one product id.
    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, StoreError>;
}

/// Postgres-backed catalog store
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Run one store round trip under the configured deadline.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        match timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(format!(
                "query exceeded {}ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn count_products(&self, query: &str, category: &str) -> Result<i64, StoreError> {
        self.bounded(
            sqlx::query_scalar::<_, i64>(SQL_COUNT_PRODUCTS)
                .bind(query)
                .bind(category)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn list_products(
        &self,
        query: &str,
        category: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductSummary>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, ProductSummary>(SQL_LIST_PRODUCTS)
                .bind(query)
                .bind(category)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn lookup_similar(
        &self,
        name: &str,
        pack: &str,
        threshold: f32,
    ) -> Result<Vec<PriceQuote>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, PriceQuote>(SQL_LOOKUP_FUZZY)
                .bind(name)
                .bind(pack)
                .bind(threshold)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn lookup_substring(
        &self,
        name: &str,
        pack: &str,
    ) -> Result<Vec<PriceQuote>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, PriceQuote>(SQL_LOOKUP_SUBSTRING)
                .bind(name)
                .bind(pack)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn fetch_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.bounded(
            sqlx::query_as::<_, Product>(SQL_PRODUCT_DETAIL)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }
}

/// Create the bounded connection pool, retrying with exponential backoff
/// and random jitter, then probe it with `SELECT 1`.
pub async fn connect_with_retry(config: &BotConfig) -> Result<PgPool, StoreError> {
    let mut delay = Duration::from_millis(BASE_RETRY_DELAY_MS);
    let mut attempt = 1;
    loop {
        let connected = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.query_timeout)
            .connect(&config.database_url)
            .await;

        match connected {
            Ok(pool) => {
                sqlx::query("SELECT 1")
                    .execute(&pool)
                    .await
                    .map_err(StoreError::from)?;
                info!(
                    max_connections = config.max_connections,
                    "Database connection pool established"
                );
                return Ok(pool);
            }
            Err(e) if attempt < MAX_CONNECT_ATTEMPTS => {
                let jitter = rand::thread_rng().gen_range(0..RETRY_JITTER_MS);
                warn!(
                    attempt,
                    error = %e,
                    retry_in_ms = delay.as_millis() as u64 + jitter,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(delay + Duration::from_millis(jitter)).await;
                delay = (delay * 2).min(Duration::from_millis(MAX_RETRY_DELAY_MS));
                attempt += 1;
            }
            Err(e) => return Err(StoreError::Connection(e.to_string())),
        }
    }
}
