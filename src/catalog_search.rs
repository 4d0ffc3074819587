//! # Catalog Search Module
//!
//! The query core of the bot: paginated catalog listing, the two-tier
//! fuzzy/substring price lookup and the product detail fetch, all running
//! against a [`CatalogStore`].
//!
//! The price lookup tries trigram similarity first and only falls back to
//! substring matching when similarity produced nothing or is unavailable.
//! That distinction (`Empty` vs `Failed`) is kept visible in
//! [`SearchTier`] even though both resolve to the same fallback, so the
//! policy stays testable.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog_store::{CatalogStore, StoreError};
use crate::config::MAX_PRICE_RESULTS;
use crate::product_model::{PriceQuote, ProductDetail, ProductSummary};

/// Outcome of a paginated listing request.
///
/// A store failure is carried as its own variant rather than collapsed
/// into an empty page; the bot layer chooses how to render it (today:
/// the same "no products" message the empty page gets).
#[derive(Debug)]
pub enum ListOutcome {
    Page {
        /// Matching rows across all pages
        total: i64,
        /// The requested page window, possibly empty past the last page
        rows: Vec<ProductSummary>,
    },
    Failed(StoreError),
}

impl ListOutcome {
    /// The rows to render; a failed listing renders like an empty one.
    pub fn rows(&self) -> &[ProductSummary] {
        match self {
            ListOutcome::Page { rows, .. } => rows,
            ListOutcome::Failed(_) => &[],
        }
    }

    pub fn total(&self) -> i64 {
        match self {
            ListOutcome::Page { total, .. } => *total,
            ListOutcome::Failed(_) => 0,
        }
    }
}

/// Result of the primary (similarity) lookup tier
#[derive(Debug)]
pub enum SearchTier {
    /// Similarity search matched; the fallback must not run
    Hits(Vec<PriceQuote>),
    /// Similarity search ran but matched nothing
    Empty,
    /// Similarity search itself failed (e.g. missing `pg_trgm`)
    Failed(StoreError),
}

/// Zero-based row offset of a page window; pages below 1 behave as page 1.
/// Saturates instead of overflowing for absurd page numbers, which the
/// command grammar accepts as long as they fit an i64.
pub fn page_offset(page: i64, page_size: i64) -> i64 {
    page.max(1).saturating_sub(1).saturating_mul(page_size)
}

/// Highest page number for a result count, never less than 1.
pub fn last_page(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 1;
    }
    ((total + page_size - 1) / page_size).max(1)
}

/// Catalog query service bound to one store client
pub struct CatalogSearchService<S> {
    store: Arc<S>,
}

impl<S: CatalogStore> CatalogSearchService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch one page of the catalog listing.
    ///
    /// `query` filters by case-insensitive name substring, `category` by
    /// case-insensitive exact match; either may be empty to skip the
    /// filter. Pages past the end come back as an empty row set with the
    /// real total, so callers can still compute the last page.
    pub async fn list_page(
        &self,
        query: &str,
        category: &str,
        page: i64,
        page_size: i64,
    ) -> ListOutcome {
        let page = page.max(1);
        let offset = page_offset(page, page_size);

        let total = match self.store.count_products(query, category).await {
            Ok(total) => total,
            Err(e) => {
                warn!(error = %e, query, category, "Catalog count failed");
                return ListOutcome::Failed(e);
            }
        };

        match self
            .store
            .list_products(query, category, page_size, offset)
            .await
        {
            Ok(rows) => ListOutcome::Page { total, rows },
            Err(e) => {
                warn!(error = %e, query, category, page, "Catalog listing failed");
                ListOutcome::Failed(e)
            }
        }
    }

    /// Price lookup: similarity search first, substring fallback second.
    ///
    /// The fallback runs only when the primary tier produced no rows,
    /// whether because nothing scored above `threshold` or because the
    /// similarity capability itself failed. Errors never surface to the
    /// caller; the worst outcome is an empty list. Results are capped at
    /// [`MAX_PRICE_RESULTS`].
    pub async fn find_prices(&self, name: &str, pack: &str, threshold: f32) -> Vec<PriceQuote> {
        let name = name.trim();
        let pack = pack.trim();

        match self.similarity_tier(name, pack, threshold).await {
            SearchTier::Hits(rows) => rows,
            SearchTier::Empty => {
                debug!(name, "Similarity search matched nothing, trying substring");
                self.substring_tier(name, pack).await
            }
            SearchTier::Failed(e) => {
                warn!(error = %e, name, "Similarity search unavailable, trying substring");
                self.substring_tier(name, pack).await
            }
        }
    }

    /// Run the primary similarity tier and report how it went.
    pub async fn similarity_tier(&self, name: &str, pack: &str, threshold: f32) -> SearchTier {
        match self.store.lookup_similar(name, pack, threshold).await {
            Ok(rows) if rows.is_empty() => SearchTier::Empty,
            Ok(mut rows) => {
                rows.truncate(MAX_PRICE_RESULTS);
                SearchTier::Hits(rows)
            }
            Err(e) => SearchTier::Failed(e),
        }
    }

    async fn substring_tier(&self, name: &str, pack: &str) -> Vec<PriceQuote> {
        match self.store.lookup_substring(name, pack).await {
            Ok(mut rows) => {
                rows.truncate(MAX_PRICE_RESULTS);
                rows
            }
            Err(e) => {
                warn!(error = %e, name, "Substring lookup failed");
                Vec::new()
            }
        }
    }

    /// Fetch and assemble the detail view for one product id.
    ///
    /// `Ok(None)` means the id does not exist; a store failure propagates
    /// so callers can tell "not found" from "store unreachable".
    pub async fn product_detail(&self, id: i64) -> Result<Option<ProductDetail>, StoreError> {
        let product = self.store.fetch_product(id).await?;
        Ok(product.as_ref().map(ProductDetail::from_product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 5), 0);
        assert_eq!(page_offset(3, 5), 10);
        // Pages below 1 behave as page 1
        assert_eq!(page_offset(0, 5), 0);
        assert_eq!(page_offset(-2, 5), 0);
    }

    #[test]
    fn test_page_offset_saturates_on_huge_pages() {
        assert_eq!(page_offset(i64::MAX, 5), i64::MAX);
        assert_eq!(page_offset(i64::MAX, 1), i64::MAX - 1);
    }

    #[test]
    fn test_last_page() {
        assert_eq!(last_page(0, 5), 1);
        assert_eq!(last_page(1, 5), 1);
        assert_eq!(last_page(5, 5), 1);
        assert_eq!(last_page(6, 5), 2);
        assert_eq!(last_page(12, 5), 3);
        assert_eq!(last_page(15, 5), 3);
    }

    #[test]
    fn test_last_page_degenerate_page_size() {
        assert_eq!(last_page(10, 0), 1);
    }
}
