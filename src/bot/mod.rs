//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: routes incoming text commands
//! - `callback_handler`: handles inline keyboard callback queries
//! - `callback_data`: the wire schema of callback tokens
//! - `ui_builder`: builds catalog messages and keyboards

pub mod callback_data;
pub mod callback_handler;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

// User-facing replies, shared by both handlers
pub(crate) const NO_PRODUCTS_MESSAGE: &str = "Tidak ada produk untuk filter tersebut.";
pub(crate) const PRODUCT_NOT_FOUND_MESSAGE: &str = "Produk tidak ditemukan.";
pub(crate) const PRICE_NOT_FOUND_MESSAGE: &str =
    "Tidak ditemukan. Coba nama lebih sederhana atau sertakan pack (mis. 100g / 250g / Box).";
pub(crate) const ACCESS_RESTRICTED_MESSAGE: &str =
    "Access restricted. Ask admin to allow your Telegram ID.";
pub(crate) const GENERIC_FAILURE_MESSAGE: &str = "Maaf, terjadi kesalahan. Silakan coba lagi.";
pub(crate) const HELP_MESSAGE: &str = "Perintah:\n\
/harga <nama> [pack <teks>]\n\
/produk [kata] [kategori X] [page N]\n\
/vaksin [kata] [page N]\n\
Contoh: /produk vita kategori Peternakan page 2";
