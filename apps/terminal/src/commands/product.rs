//! # Product Commands
//!
//! Menu browsing.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  > products papas cheddar                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  Is the first word a category tag?        │                         │
//! │  │  YES: filter by category, rest is text    │                         │
//! │  │  NO:  every word is search text           │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Catalog::search ──► Vec<ProductDto>                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use lomi_core::{Catalog, Money, Product, ProductCategory, ProductQuery};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;

/// What the product list shows for one product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: ProductCategory,
    pub price: Money,
    pub is_available: bool,
    pub is_best_seller: bool,
    /// `(id, name, price)` of each offered extra.
    pub extras: Vec<(String, String, Money)>,
    /// `(id, name)` of each removable ingredient.
    pub exclusions: Vec<(String, String)>,
}

impl From<&Product> for ProductDto {
    fn from(p: &Product) -> Self {
        ProductDto {
            id: p.id.clone(),
            name: p.name.clone(),
            category: p.category,
            price: p.price,
            is_available: p.is_available,
            is_best_seller: p.is_best_seller,
            extras: p
                .extras
                .iter()
                .map(|e| (e.id.clone(), e.name.clone(), e.price))
                .collect(),
            exclusions: p
                .exclusions
                .iter()
                .map(|e| (e.id.clone(), e.name.clone()))
                .collect(),
        }
    }
}

/// Lists products, optionally filtered by a category tag and search text.
///
/// ## Arguments
/// * `words` - `[category] [text...]`; a leading word that names a category
///   is used as the category filter
///
/// Unavailable products are listed too, flagged, so the cashier can tell
/// the customer.
pub fn search_products(catalog: &Catalog, words: &[&str]) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();

    let (category, text_words) = match words.split_first() {
        Some((first, rest)) => match ProductCategory::parse(first) {
            Some(category) => (Some(category), rest),
            None => (None, words),
        },
        None => (None, words),
    };
    let query = ProductQuery {
        text: text_words.join(" "),
        category,
        available_only: false,
    };

    debug!(text = %query.text, category = ?query.category, "search_products command");

    let products: Vec<ProductDto> = catalog
        .search(&query)?
        .into_iter()
        .map(ProductDto::from)
        .collect();

    debug!(
        elapsed_us = start.elapsed().as_micros() as u64,
        count = products.len(),
        "search_products complete"
    );

    Ok(products)
}

/// Best sellers, shown when the product list is opened with no filter.
pub fn best_sellers(catalog: &Catalog) -> Vec<ProductDto> {
    debug!("best_sellers command");
    catalog.best_sellers().map(ProductDto::from).collect()
}
