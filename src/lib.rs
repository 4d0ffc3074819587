//! # Obatbot
//!
//! A Telegram bot front end for a veterinary/agricultural product catalog
//! stored in Postgres. Users query prices with `/harga`, browse the
//! catalog with `/produk` and `/vaksin`, and page through results via
//! inline keyboards.

pub mod bot;
pub mod catalog_search;
pub mod catalog_store;
pub mod command_parser;
pub mod config;
pub mod formatting;
pub mod product_model;
