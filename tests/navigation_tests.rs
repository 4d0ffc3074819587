//! Integration tests for the stateless pagination flow: command text in,
//! navigation tokens out, and back again on the next callback.

use obatbot::bot::callback_data::CallbackData;
use obatbot::bot::ui_builder::{catalog_keyboard, catalog_page_body};
use obatbot::catalog_search::page_offset;
use obatbot::command_parser::{parse_command, CatalogArgs, Command};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardButtonKind, InlineKeyboardMarkup};

fn nav_payloads(keyboard: &InlineKeyboardMarkup) -> Vec<(String, String)> {
    keyboard.inline_keyboard[1]
        .iter()
        .map(|button: &InlineKeyboardButton| {
            let payload = match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                other => panic!("expected callback button, got {other:?}"),
            };
            (button.text.clone(), payload)
        })
        .collect()
}

fn sample_rows(count: usize) -> Vec<obatbot::product_model::ProductSummary> {
    (0..count)
        .map(|i| obatbot::product_model::ProductSummary {
            id: i as i64 + 1,
            name: format!("Produk {}", i + 1),
            pack: "Box".to_string(),
            price: 5000,
            category: "Peternakan".to_string(),
            subcategory: String::new(),
        })
        .collect()
}

#[test]
fn command_filters_survive_a_full_page_round_trip() {
    // User asks for page 2 of a filtered listing
    let Command::Produk(args) = parse_command("/produk vita kategori Peternakan page 2") else {
        panic!("expected a /produk command");
    };
    assert_eq!(args.page, 2);

    // The keyboard for that page carries the filters in its nav tokens
    let keyboard = catalog_keyboard(&args, &sample_rows(5), 12, 5);
    let nav = nav_payloads(&keyboard);
    assert_eq!(nav[0].0, "« Prev");
    assert_eq!(nav[0].1, "page:1:vita:Peternakan");
    assert_eq!(nav[1].0, "2/3");
    assert_eq!(nav[2].0, "Next »");
    assert_eq!(nav[2].1, "page:3:vita:Peternakan");

    // The next callback reconstructs the exact same query state
    let parsed = CallbackData::parse(&nav[2].1).expect("nav token must parse");
    assert_eq!(
        parsed,
        CallbackData::Page(CatalogArgs {
            query: "vita".to_string(),
            category: "Peternakan".to_string(),
            page: 3,
        })
    );
}

#[test]
fn unfiltered_listing_round_trips_empty_fields() {
    let Command::Produk(args) = parse_command("/produk") else {
        panic!("expected a /produk command");
    };

    let keyboard = catalog_keyboard(&args, &sample_rows(5), 6, 5);
    let nav = nav_payloads(&keyboard);
    // First page: indicator plus Next only
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[1].1, "page:2::");

    let parsed = CallbackData::parse(&nav[1].1).expect("nav token must parse");
    assert_eq!(parsed, CallbackData::Page(CatalogArgs { page: 2, ..Default::default() }));
}

#[test]
fn absurd_page_numbers_never_overflow_the_page_math() {
    // i64::MAX is a valid page token as far as the grammar is concerned
    let Command::Produk(args) = parse_command("/produk page 9223372036854775807") else {
        panic!("expected a /produk command");
    };
    assert_eq!(args.page, i64::MAX);

    // The offset saturates instead of wrapping or panicking
    assert_eq!(page_offset(args.page, 5), i64::MAX);

    // Rendering the (empty, far past the end) page stays well-behaved too
    let body = catalog_page_body(&args, &sample_rows(1), 5);
    assert!(body.starts_with("Daftar Produk"));
    let keyboard = catalog_keyboard(&args, &sample_rows(1), 12, 5);
    let nav = nav_payloads(&keyboard);
    // Past the last page there is no Next, only Prev and the indicator
    assert_eq!(nav.len(), 2);
    assert_eq!(nav[0].0, "« Prev");
}

#[test]
fn detail_buttons_point_at_row_ids() {
    let Command::Produk(args) = parse_command("/produk page 3") else {
        panic!("expected a /produk command");
    };

    let keyboard = catalog_keyboard(&args, &sample_rows(2), 12, 5);
    let detail_row = &keyboard.inline_keyboard[0];

    // Numbering continues from the absolute offset of page 3
    assert_eq!(detail_row[0].text, "Detail 11");
    assert_eq!(detail_row[1].text, "Detail 12");

    match &detail_row[0].kind {
        InlineKeyboardButtonKind::CallbackData(data) => {
            assert_eq!(CallbackData::parse(data), Some(CallbackData::Product { id: 1 }));
        }
        other => panic!("expected callback button, got {other:?}"),
    }
}
