//! # Product Model Module
//!
//! Row types returned by the catalog store and the assembly of the
//! display-ready product detail view.
//!
//! All optional text columns in the catalog table may be NULL or blank;
//! the detail assembly drops such fields entirely so that downstream
//! formatting never renders a placeholder.

use crate::formatting::{escape_markdown_v2, rupiah};

/// A row of the paginated catalog listing
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub pack: String,
    pub price: i64,
    pub category: String,
    pub subcategory: String,
}

/// A price lookup hit: `(name, pack, price)` as stored
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PriceQuote {
    pub name: String,
    pub pack: String,
    pub price: i64,
}

/// The full catalog record behind a single product id
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub sku: Option<String>,
    pub name: String,
    pub pack: Option<String>,
    pub price: i64,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub function: Option<String>,
    pub description: Option<String>,
    pub indications: Option<String>,
    pub dosage: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

/// Display-ready structure assembled from a [`Product`].
///
/// Only fields that are actually present in the record appear here;
/// blank or NULL columns are omitted rather than carried as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub title: String,
    /// `pack • category • subcategory`, built from whichever parts exist
    pub subtitle: Option<String>,
    pub price: i64,
    pub sku: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    /// Long-form `(label, text)` sections in fixed display order
    pub sections: Vec<(&'static str, String)>,
}

/// Long-form fields and the labels they are rendered under
const SECTION_LABELS: [(&str, fn(&Product) -> &Option<String>); 4] = [
    ("Fungsi", |p| &p.function),
    ("Deskripsi", |p| &p.description),
    ("Indikasi", |p| &p.indications),
    ("Aturan pakai", |p| &p.dosage),
];

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ProductDetail {
    /// Assemble the detail view from a catalog record.
    pub fn from_product(product: &Product) -> Self {
        let subtitle_bits: Vec<String> = [&product.pack, &product.category, &product.subcategory]
            .into_iter()
            .filter_map(present)
            .collect();
        let subtitle = if subtitle_bits.is_empty() {
            None
        } else {
            Some(subtitle_bits.join("  •  "))
        };

        let sections = SECTION_LABELS
            .iter()
            .filter_map(|(label, get)| present(get(product)).map(|text| (*label, text)))
            .collect();

        Self {
            title: product.name.clone(),
            subtitle,
            price: product.price,
            sku: present(&product.sku),
            url: present(&product.url),
            image_url: present(&product.image_url),
            sections,
        }
    }

    /// The short MarkdownV2 caption: title, subtitle, price, SKU and link.
    pub fn caption(&self) -> String {
        let mut lines = vec![format!("*{}*", escape_markdown_v2(&self.title))];
        if let Some(subtitle) = &self.subtitle {
            lines.push(escape_markdown_v2(subtitle));
        }
        lines.push(format!("Harga: *{}*", escape_markdown_v2(&rupiah(self.price))));
        if let Some(sku) = &self.sku {
            lines.push(format!("SKU: {}", escape_markdown_v2(sku)));
        }
        if let Some(url) = &self.url {
            lines.push(format!("[Info produk]({})", escape_markdown_v2(url)));
        }
        lines.join("\n")
    }

    /// The long-form MarkdownV2 body; empty when no sections are present.
    pub fn long_text(&self) -> String {
        self.sections
            .iter()
            .map(|(label, text)| format!("*{}:*\n{}", label, escape_markdown_v2(text)))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_product() -> Product {
        Product {
            id: 1,
            sku: None,
            name: "Vita Stress".to_string(),
            pack: None,
            price: 15000,
            category: None,
            subcategory: None,
            function: None,
            description: None,
            indications: None,
            dosage: None,
            url: None,
            image_url: None,
        }
    }

    #[test]
    fn test_detail_omits_missing_fields() {
        let detail = ProductDetail::from_product(&bare_product());

        assert_eq!(detail.title, "Vita Stress");
        assert_eq!(detail.subtitle, None);
        assert_eq!(detail.sku, None);
        assert_eq!(detail.url, None);
        assert_eq!(detail.image_url, None);
        assert!(detail.sections.is_empty());

        let caption = detail.caption();
        assert!(!caption.contains("SKU"));
        assert!(!caption.contains("Info produk"));
        assert!(detail.long_text().is_empty());
    }

    #[test]
    fn test_detail_blank_strings_count_as_missing() {
        let mut product = bare_product();
        product.sku = Some("   ".to_string());
        product.function = Some(String::new());

        let detail = ProductDetail::from_product(&product);
        assert_eq!(detail.sku, None);
        assert!(detail.sections.is_empty());
    }

    #[test]
    fn test_detail_subtitle_joins_present_parts() {
        let mut product = bare_product();
        product.pack = Some("100g".to_string());
        product.subcategory = Some("Suplemen".to_string());

        let detail = ProductDetail::from_product(&product);
        assert_eq!(detail.subtitle.as_deref(), Some("100g  •  Suplemen"));
    }

    #[test]
    fn test_detail_sections_keep_display_order() {
        let mut product = bare_product();
        product.dosage = Some("1 gram per liter".to_string());
        product.function = Some("Multivitamin".to_string());

        let detail = ProductDetail::from_product(&product);
        let labels: Vec<&str> = detail.sections.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Fungsi", "Aturan pakai"]);
    }

    #[test]
    fn test_caption_escapes_markdown() {
        let mut product = bare_product();
        product.name = "Vita-Stress (100g)".to_string();

        let detail = ProductDetail::from_product(&product);
        let caption = detail.caption();
        assert!(caption.starts_with("*Vita\\-Stress \\(100g\\)*"));
        assert!(caption.contains("Harga: *Rp15\\.000*"));
    }
}
