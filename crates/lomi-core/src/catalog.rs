//! # Catalog
//!
//! The read-only menu the cart sells from.
//!
//! A [`Catalog`] is built once (from JSON or from a product list), checked,
//! and then only read. Share it between views with an `Arc`.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Category chip: "papas"       Search box: "cheddar"                     │
//! │          │                            │                                 │
//! │          └─────────────┬──────────────┘                                 │
//! │                        ▼                                                │
//! │              Catalog::search(query)                                     │
//! │                        │                                                │
//! │                        ▼                                                │
//! │   name OR description contains "cheddar", category == papas             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, ProductCategory};
use crate::validation::{validate_product_prices, validate_required, validate_search_query};

/// Filter for [`Catalog::search`].
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Case-insensitive substring of name or description.
    pub text: String,
    pub category: Option<ProductCategory>,
    /// Hide products marked unavailable.
    pub available_only: bool,
}

/// An immutable, validated list of products.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, rejecting records that break catalog rules.
    ///
    /// ## Rules
    /// - Product ids are non-empty and unique
    /// - Product names are non-empty
    /// - Product and extra prices are non-negative and at most
    ///   `MAX_PRICE_UNITS`
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut seen = HashSet::new();

        for product in &products {
            validate_required("product id", &product.id)?;
            validate_required("product name", &product.name)?;
            validate_product_prices(product)?;

            if !seen.insert(product.id.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.clone(),
                }
                .into());
            }
        }

        Ok(Catalog { products })
    }

    /// Parses a JSON array of products.
    ///
    /// ## Example
    /// ```rust
    /// use lomi_core::catalog::Catalog;
    ///
    /// let json = r#"[{"id": "p1", "name": "Lomito", "price": 5000,
    ///                "category": "lomitos", "is_available": true}]"#;
    /// let catalog = Catalog::from_json(json).unwrap();
    /// assert_eq!(catalog.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidCatalog(e.to_string()))?;
        Catalog::new(products)
    }

    /// All products, in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Finds a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Finds a product by id, failing with `ProductNotFound`.
    pub fn require(&self, id: &str) -> CoreResult<&Product> {
        self.get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Products matching the query, in catalog order.
    pub fn search(&self, query: &ProductQuery) -> CoreResult<Vec<&Product>> {
        let text = validate_search_query(&query.text)?;

        Ok(self
            .products
            .iter()
            .filter(|p| query.category.map_or(true, |c| p.category == c))
            .filter(|p| !query.available_only || p.is_available)
            .filter(|p| {
                text.is_empty()
                    || p.name.to_lowercase().contains(&text)
                    || p.description.to_lowercase().contains(&text)
            })
            .collect())
    }

    /// Products flagged as best sellers.
    pub fn best_sellers(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_best_seller)
    }

    /// Categories that have at least one product, in menu order.
    pub fn categories(&self) -> Vec<ProductCategory> {
        ProductCategory::ALL
            .into_iter()
            .filter(|c| self.products.iter().any(|p| p.category == *c))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
