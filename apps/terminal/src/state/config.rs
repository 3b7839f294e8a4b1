//! # Configuration State
//!
//! Stores terminal configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`LOMI_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use lomi_core::validation::validate_price;
use lomi_core::{Money, Pricing, TaxRate, DELIVERY_FEE_UNITS};
use serde::Serialize;

/// Terminal configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (printed in the header and on the daily report)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Tax applied on the subtotal
    pub tax_rate: TaxRate,

    /// Flat surcharge for delivery orders
    pub delivery_fee: Money,

    /// Highest table number in the dining room
    pub table_count: u32,

    /// Catalog JSON file. `None` uses the embedded demo menu.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Lomitería Demo"
    /// - Tax: 21% IVA
    /// - Delivery fee: 500
    /// - Tables: 12
    fn default() -> Self {
        ConfigState {
            store_name: "Lomitería Demo".to_string(),
            currency_symbol: "$".to_string(),
            tax_rate: TaxRate::default(),
            delivery_fee: Money::from_units(DELIVERY_FEE_UNITS),
            table_count: 12,
            catalog_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `LOMI_STORE_NAME`: Override store name
    /// - `LOMI_CURRENCY`: Override currency symbol (e.g., "ARS ")
    /// - `LOMI_TAX_RATE`: Override tax rate as a percentage (e.g., "10.5")
    /// - `LOMI_DELIVERY_FEE`: Override delivery fee (e.g., "650")
    /// - `LOMI_CATALOG`: Path to a catalog JSON file
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("LOMI_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("LOMI_CURRENCY").filter(|s| !s.trim().is_empty()) {
            config.currency_symbol = symbol;
        }

        if let Some(tax_rate_str) = lookup("LOMI_TAX_RATE") {
            match tax_rate_str.trim().parse::<f64>() {
                Ok(rate) if (0.0..=100.0).contains(&rate) => {
                    config.tax_rate = TaxRate::from_percentage(rate);
                }
                _ => tracing::warn!(value = %tax_rate_str, "Ignoring invalid LOMI_TAX_RATE"),
            }
        }

        if let Some(fee_str) = lookup("LOMI_DELIVERY_FEE") {
            match fee_str.parse::<Money>() {
                Ok(fee) if validate_price("delivery fee", fee).is_ok() => config.delivery_fee = fee,
                _ => tracing::warn!(value = %fee_str, "Ignoring invalid LOMI_DELIVERY_FEE"),
            }
        }

        if let Some(path) = lookup("LOMI_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Pricing rules for new carts.
    pub fn pricing(&self) -> Pricing {
        Pricing {
            tax_rate: self.tax_rate,
            delivery_fee: self.delivery_fee,
        }
    }

    /// Formats an amount with the store's currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use lomi_core::Money;
    /// use lomi_terminal::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        // Money's Display already rounds half-to-even and prints "$"
        let formatted = amount.to_string();
        if self.currency_symbol == "$" {
            formatted
        } else {
            formatted.replacen('$', &self.currency_symbol, 1)
        }
    }
}
