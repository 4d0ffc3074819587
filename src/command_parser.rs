//! # Command Parser Module
//!
//! This module turns raw Telegram message text into catalog commands,
//! including the loosely-structured trailing arguments of `/produk`,
//! `/vaksin` and `/harga`.
//!
//! The argument grammar is deliberately forgiving: `page <N>` and
//! `kategori <value>` may appear anywhere and in any order, quoted
//! category values keep their internal spaces, and anything left over
//! becomes the free-text query. Malformed input never fails; missing
//! tokens simply fall back to their defaults.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PRODUK_CMD_RE: Regex = Regex::new(r"(?is)^/?produk(?:\s+(.*))?$").unwrap();
    static ref VAKSIN_CMD_RE: Regex = Regex::new(r"(?is)^/?vaksin(?:\s+(.*))?$").unwrap();
    static ref HARGA_CMD_RE: Regex = Regex::new(r"(?is)^/?harga(?:\s+(.*))?$").unwrap();
    static ref PAGE_RE: Regex = Regex::new(r"(?i)\bpage\s+(\d+)\b").unwrap();
    static ref KATEGORI_QUOTED_RE: Regex = Regex::new(r#"(?i)\bkategori\s+"([^"]*)""#).unwrap();
    static ref KATEGORI_KEYWORD_RE: Regex = Regex::new(r"(?i)\bkategori\b").unwrap();
    static ref HARGA_ARGS_RE: Regex = Regex::new(r"(?is)^(.+?)(?:\s+pack\s+(.+))?$").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Arguments extracted from a `/produk` style command tail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogArgs {
    /// Free-text name filter, empty when absent
    pub query: String,
    /// Category filter, empty when absent
    pub category: String,
    /// Requested page, clamped to a minimum of 1
    pub page: i64,
}

impl Default for CatalogArgs {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: String::new(),
            page: 1,
        }
    }
}

/// A recognized bot command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/harga <name> [pack <text>]`
    Harga { name: String, pack: String },
    /// `/produk [<text>] [kategori <value>] [page <N>]`
    Produk(CatalogArgs),
    /// `/vaksin [<text>] [page <N>]`
    Vaksin { query: String, page: i64 },
    /// Anything else, answered with the command overview
    Help,
}

/// Match the full message text against the known command grammars.
///
/// Unrecognized text (including a bare `/harga` with no product name)
/// maps to [`Command::Help`].
pub fn parse_command(text: &str) -> Command {
    let text = text.trim();

    if let Some(caps) = PRODUK_CMD_RE.captures(text) {
        let args = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return Command::Produk(parse_catalog_args(args));
    }

    if let Some(caps) = VAKSIN_CMD_RE.captures(text) {
        let args = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let (query, page) = parse_vaksin_args(args);
        return Command::Vaksin { query, page };
    }

    if let Some(caps) = HARGA_CMD_RE.captures(text) {
        let args = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim();
        if !args.is_empty() {
            let (name, pack) = parse_price_args(args);
            return Command::Harga { name, pack };
        }
    }

    Command::Help
}

/// Extract `(query, category, page)` from a `/produk` command tail.
///
/// `page <N>` and `kategori <value>` are recognized case-insensitively in
/// either order; the category value is either a double-quoted phrase
/// (captured verbatim) or a bare phrase running up to the next `page <N>`
/// token or the end of the string. Whatever text is left after removing
/// both tokens becomes the free-text query.
pub fn parse_catalog_args(args: &str) -> CatalogArgs {
    // Byte ranges of every `page N` token, with the first one carrying
    // the effective page number.
    let page_tokens: Vec<(usize, usize, Option<i64>)> = PAGE_RE
        .captures_iter(args)
        .map(|caps| {
            let m = caps.get(0).unwrap();
            (m.start(), m.end(), caps[1].parse::<i64>().ok())
        })
        .collect();

    let page = page_tokens
        .first()
        .and_then(|&(_, _, n)| n)
        .unwrap_or(1)
        .max(1);

    let mut cut_ranges: Vec<(usize, usize)> =
        page_tokens.iter().map(|&(start, end, _)| (start, end)).collect();

    let category = if let Some(caps) = KATEGORI_QUOTED_RE.captures(args) {
        let m = caps.get(0).unwrap();
        cut_ranges.push((m.start(), m.end()));
        caps[1].to_string()
    } else if let Some(keyword) = KATEGORI_KEYWORD_RE.find(args) {
        // Bare value: everything between the keyword and the next page
        // token (or end of string).
        let value_start = keyword.end();
        let value_end = page_tokens
            .iter()
            .map(|&(start, _, _)| start)
            .find(|&start| start >= value_start)
            .unwrap_or(args.len());
        cut_ranges.push((keyword.start(), value_end));
        args[value_start..value_end].trim().to_string()
    } else {
        String::new()
    };

    let query = collapse_whitespace(&remove_ranges(args, cut_ranges));

    CatalogArgs {
        query,
        category,
        page,
    }
}

/// Extract `(query, page)` from a `/vaksin` command tail.
///
/// Same grammar as [`parse_catalog_args`] minus the category marker, which
/// `/vaksin` does not recognize.
pub fn parse_vaksin_args(args: &str) -> (String, i64) {
    let page = PAGE_RE
        .captures(args)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .unwrap_or(1)
        .max(1);
    let query = collapse_whitespace(&PAGE_RE.replace_all(args, " "));
    (query, page)
}

/// Split a `/harga` command tail into `(name, pack)`.
///
/// The pack filter is everything after the first `pack` keyword; without
/// one, the whole tail is the product name.
pub fn parse_price_args(args: &str) -> (String, String) {
    match HARGA_ARGS_RE.captures(args.trim()) {
        Some(caps) => {
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            let pack = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            (name.to_string(), pack.to_string())
        }
        None => (String::new(), String::new()),
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Rebuild `text` with the given byte ranges cut out. Ranges may touch or
/// overlap; they must lie on character boundaries (they come from regex
/// matches over the same string).
fn remove_ranges(text: &str, mut ranges: Vec<(usize, usize)>) -> String {
    ranges.sort_unstable();
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;
    for (start, end) in ranges {
        if start > pos {
            result.push_str(&text[pos..start]);
        }
        pos = pos.max(end);
    }
    if pos < text.len() {
        result.push_str(&text[pos..]);
    }
    result
}
