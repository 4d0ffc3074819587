//! UI Builder module for catalog list messages and inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bot::callback_data::CallbackData;
use crate::catalog_search::{last_page, page_offset};
use crate::command_parser::CatalogArgs;
use crate::formatting::rupiah;
use crate::product_model::ProductSummary;

/// Format one page of the catalog listing as plain text.
///
/// Rows are numbered with their absolute position in the full result set
/// so the numbering keeps counting across pages, and the active filters
/// are echoed in the header.
pub fn catalog_page_body(args: &CatalogArgs, rows: &[ProductSummary], page_size: i64) -> String {
    let start = page_offset(args.page, page_size).saturating_add(1);

    let mut header_bits = Vec::new();
    if !args.query.is_empty() {
        header_bits.push(format!("filter nama: {}", args.query));
    }
    if !args.category.is_empty() {
        header_bits.push(format!("kategori: {}", args.category));
    }
    let header = if header_bits.is_empty() {
        "Daftar Produk".to_string()
    } else {
        format!("Daftar Produk ({})", header_bits.join(" | "))
    };

    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            format!(
                "{}. {} — {} — {}",
                start.saturating_add(i as i64),
                row.name,
                row.pack,
                rupiah(row.price)
            )
        })
        .collect();

    format!("{header}\n{}", lines.join("\n"))
}

/// Build the inline keyboard for a catalog page: a row of detail buttons
/// plus a navigation row with the page indicator and conditional
/// Prev/Next buttons.
pub fn catalog_keyboard(
    args: &CatalogArgs,
    rows: &[ProductSummary],
    total: i64,
    page_size: i64,
) -> InlineKeyboardMarkup {
    let start = page_offset(args.page, page_size).saturating_add(1);
    let last = last_page(total, page_size);

    let detail_row: Vec<InlineKeyboardButton> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            InlineKeyboardButton::callback(
                format!("Detail {}", start.saturating_add(i as i64)),
                CallbackData::Product { id: row.id }.encode(),
            )
        })
        .collect();

    let mut nav_row = Vec::new();
    if args.page > 1 {
        nav_row.push(InlineKeyboardButton::callback(
            "« Prev",
            CallbackData::Page(CatalogArgs {
                page: args.page - 1,
                ..args.clone()
            })
            .encode(),
        ));
    }
    nav_row.push(InlineKeyboardButton::callback(
        format!("{}/{}", args.page, last),
        CallbackData::Noop.encode(),
    ));
    if args.page < last {
        nav_row.push(InlineKeyboardButton::callback(
            "Next »",
            CallbackData::Page(CatalogArgs {
                page: args.page + 1,
                ..args.clone()
            })
            .encode(),
        ));
    }

    InlineKeyboardMarkup::new(vec![detail_row, nav_row])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn row(id: i64, name: &str, pack: &str, price: i64) -> ProductSummary {
        ProductSummary {
            id,
            name: name.to_string(),
            pack: pack.to_string(),
            price,
            category: String::new(),
            subcategory: String::new(),
        }
    }

    fn args(query: &str, category: &str, page: i64) -> CatalogArgs {
        CatalogArgs {
            query: query.to_string(),
            category: category.to_string(),
            page,
        }
    }

    fn callback_payload(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("expected callback button, got {other:?}"),
        }
    }

    #[test]
    fn test_body_plain_header_without_filters() {
        let body = catalog_page_body(&args("", "", 1), &[row(1, "Vita Stress", "100g", 15000)], 5);
        assert!(body.starts_with("Daftar Produk\n"));
        assert!(body.contains("1. Vita Stress — 100g — Rp15.000"));
    }

    #[test]
    fn test_body_header_echoes_filters() {
        let body = catalog_page_body(&args("vita", "Peternakan", 1), &[], 5);
        assert!(body.starts_with("Daftar Produk (filter nama: vita | kategori: Peternakan)"));
    }

    #[test]
    fn test_body_numbering_continues_across_pages() {
        let rows = [row(9, "Wormectin", "5ml", 9000)];
        let body = catalog_page_body(&args("", "", 3), &rows, 5);
        assert!(body.contains("11. Wormectin — 5ml — Rp9.000"));
    }

    #[test]
    fn test_keyboard_first_page_has_no_prev() {
        let rows = [row(7, "Vita Stress", "100g", 15000)];
        let keyboard = catalog_keyboard(&args("vita", "", 1), &rows, 12, 5);

        let detail_row = &keyboard.inline_keyboard[0];
        assert_eq!(detail_row.len(), 1);
        assert_eq!(detail_row[0].text, "Detail 1");
        assert_eq!(callback_payload(&detail_row[0]), "product:7");

        let nav_row = &keyboard.inline_keyboard[1];
        let texts: Vec<&str> = nav_row.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["1/3", "Next »"]);
        assert_eq!(callback_payload(&nav_row[1]), "page:2:vita:");
    }

    #[test]
    fn test_keyboard_last_page_has_no_next() {
        let rows = [row(7, "Wormectin", "5ml", 9000)];
        let keyboard = catalog_keyboard(&args("", "vaccine", 3), &rows, 12, 5);

        let nav_row = &keyboard.inline_keyboard[1];
        let texts: Vec<&str> = nav_row.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["« Prev", "3/3"]);
        assert_eq!(callback_payload(&nav_row[0]), "page:2::vaccine");
        assert_eq!(callback_payload(&nav_row[1]), "noop");
    }

    #[test]
    fn test_keyboard_middle_page_has_both() {
        let rows = [row(1, "A", "x", 1)];
        let keyboard = catalog_keyboard(&args("", "", 2), &rows, 12, 5);
        let nav_row = &keyboard.inline_keyboard[1];
        assert_eq!(nav_row.len(), 3);
    }
}
