//! # Formatting Module
//!
//! Text formatting helpers for Telegram replies: rupiah amounts,
//! MarkdownV2 escaping and long-message chunking.

/// Telegram caps messages at ~4096 characters; stay safely below it.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Characters reserved by Telegram MarkdownV2
const MDV2_RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Format a price in smallest-unit rupiah, e.g. `15000` -> `Rp15.000`.
pub fn rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp{grouped}")
}

/// Escape every Telegram MarkdownV2 reserved character in `text`.
pub fn escape_markdown_v2(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MDV2_RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Split a long message into chunks of at most `max_len` bytes.
///
/// Prefers to break at the last newline inside the window; when no newline
/// lands in the back part of the window the text is cut hard at the limit
/// (snapped back to a character boundary, and never between a `\` and the
/// MarkdownV2 character it escapes).
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if rest.len() <= max_len {
            chunks.push(rest.to_string());
            break;
        }
        let window = floor_char_boundary(rest, max_len);
        match rest[..window].rfind('\n') {
            Some(pos) if pos >= max_len * 3 / 5 => {
                chunks.push(rest[..pos].to_string());
                rest = &rest[pos + 1..];
            }
            _ => {
                let cut = escape_safe_cut(rest, window);
                chunks.push(rest[..cut].to_string());
                rest = &rest[cut..];
            }
        }
    }
    chunks
}

/// Pull a hard cut back off any trailing backslashes so an escape pair is
/// never split across two messages. A window made entirely of backslashes
/// is cut as-is, otherwise chunking could stop making progress.
fn escape_safe_cut(s: &str, window: usize) -> usize {
    let mut cut = window;
    while cut > 0 && s.as_bytes()[cut - 1] == b'\\' {
        cut -= 1;
    }
    if cut == 0 {
        window
    } else {
        cut
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}
