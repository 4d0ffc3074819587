//! Callback data schema for inline keyboard buttons.
//!
//! Pagination state is round-tripped through these tokens instead of any
//! server-side session, so every callback is self-contained. The `page`
//! token is the three-field shape `page:<page>:<query>:<category>`; the
//! trailing category field absorbs any embedded colons, but colons inside
//! the query are not escaped and will shift the split (known limitation
//! of the format).

use crate::command_parser::CatalogArgs;

/// A parsed inline-keyboard callback token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackData {
    /// Navigate the catalog listing: `page:<page>:<query>:<category>`
    Page(CatalogArgs),
    /// Show one product: `product:<id>`
    Product { id: i64 },
    /// Inert button (the page indicator): `noop`
    Noop,
}

impl CallbackData {
    /// Serialize into the wire token embedded in a button.
    pub fn encode(&self) -> String {
        match self {
            CallbackData::Page(args) => {
                format!("page:{}:{}:{}", args.page, args.query, args.category)
            }
            CallbackData::Product { id } => format!("product:{id}"),
            CallbackData::Noop => "noop".to_string(),
        }
    }

    /// Parse a wire token; unknown or malformed tokens yield `None`.
    pub fn parse(data: &str) -> Option<Self> {
        if data == "noop" {
            return Some(CallbackData::Noop);
        }

        if let Some(rest) = data.strip_prefix("page:") {
            let mut fields = rest.splitn(3, ':');
            let page: i64 = fields.next()?.parse().ok()?;
            let query = fields.next()?.to_string();
            let category = fields.next()?.to_string();
            return Some(CallbackData::Page(CatalogArgs {
                query,
                category,
                page: page.max(1),
            }));
        }

        if let Some(rest) = data.strip_prefix("product:") {
            let id: i64 = rest.parse().ok()?;
            return Some(CallbackData::Product { id });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_token(query: &str, category: &str, page: i64) -> CallbackData {
        CallbackData::Page(CatalogArgs {
            query: query.to_string(),
            category: category.to_string(),
            page,
        })
    }

    #[test]
    fn test_page_token_round_trip() {
        let token = page_token("vita", "Peternakan", 2);
        assert_eq!(token.encode(), "page:2:vita:Peternakan");
        assert_eq!(CallbackData::parse("page:2:vita:Peternakan"), Some(token));
    }

    #[test]
    fn test_page_token_empty_fields() {
        let token = page_token("", "", 1);
        assert_eq!(token.encode(), "page:1::");
        assert_eq!(CallbackData::parse("page:1::"), Some(token));
    }

    #[test]
    fn test_page_token_category_keeps_trailing_colons() {
        // The last field absorbs extra delimiters
        assert_eq!(
            CallbackData::parse("page:1:q:a:b"),
            Some(page_token("q", "a:b", 1))
        );
    }

    #[test]
    fn test_product_token() {
        assert_eq!(CallbackData::Product { id: 42 }.encode(), "product:42");
        assert_eq!(
            CallbackData::parse("product:42"),
            Some(CallbackData::Product { id: 42 })
        );
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert_eq!(CallbackData::parse("page:x:q:c"), None);
        assert_eq!(CallbackData::parse("page:2"), None);
        assert_eq!(CallbackData::parse("product:abc"), None);
        assert_eq!(CallbackData::parse("something"), None);
        assert_eq!(CallbackData::parse(""), None);
    }

    #[test]
    fn test_page_token_clamps_to_first_page() {
        assert_eq!(CallbackData::parse("page:0:q:c"), Some(page_token("q", "c", 1)));
    }
}
