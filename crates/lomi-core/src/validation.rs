//! # Validation Module
//!
//! Input validation utilities for Lomi POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Terminal command parsing                                     │
//! │  ├── Argument count, number parsing                                    │
//! │  └── Immediate operator feedback                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart / payment operations                                    │
//! │  └── THIS MODULE: Business rule validation                             │
//! │                                                                         │
//! │  A rejected input never changes cart or workflow state.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lomi_core::validation::{validate_quantity, validate_required};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_required("customer phone", "  ").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_UNITS, MAX_TENDERED_UNITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text value accepted (names, addresses, notes).
pub const MAX_TEXT_LEN: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a text field is present once trimmed.
///
/// ## Returns
/// The trimmed value.
///
/// ## Example
/// ```rust
/// use lomi_core::validation::validate_required;
///
/// assert_eq!(validate_required("name", "  Ana ").unwrap(), "Ana");
/// assert!(validate_required("name", "").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates optional free-text line notes.
///
/// Blank notes become `None`.
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    if notes.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(Some(notes.to_string()))
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (matches everything)
/// - Maximum 100 characters
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_lowercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0); callers treat `<= 0` as a removal before
///   reaching this check
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<u32> {
    if qty <= 0 || qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(qty as u32)
}

/// Validates a table number against the salon's table count.
pub fn validate_table_number(table: u32, table_count: u32) -> ValidationResult<u32> {
    if table == 0 || table > table_count {
        return Err(ValidationError::OutOfRange {
            field: "table number".to_string(),
            min: 1,
            max: table_count as i64,
        });
    }

    Ok(table)
}

/// Validates a price.
///
/// ## Rules
/// - Must be non-negative; zero is allowed (free items)
/// - Must not exceed MAX_PRICE_UNITS
///
/// ## Example
/// ```rust
/// use lomi_core::money::Money;
/// use lomi_core::validation::validate_price;
///
/// assert!(validate_price("price", Money::from_units(5000)).is_ok());
/// assert!(validate_price("price", Money::zero()).is_ok());
/// assert!(validate_price("price", Money::from_units(-1)).is_err());
/// assert!(validate_price("price", Money::from_units(1_000_000_001)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    validate_amount(field, price, MAX_PRICE_UNITS)
}

/// Validates cash handed over at the counter.
pub fn validate_tendered(amount: Money) -> ValidationResult<()> {
    validate_amount("amount received", amount, MAX_TENDERED_UNITS)
}

fn validate_amount(field: &str, amount: Money, max_units: i64) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    if amount > Money::from_units(max_units) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: max_units,
        });
    }

    Ok(())
}

/// Validates every price carried by a catalog product.
pub fn validate_product_prices(product: &Product) -> ValidationResult<()> {
    validate_price(&format!("price of {}", product.id), product.price)?;
    for extra in &product.extras {
        validate_price(&format!("price of extra {}", extra.id), extra.price)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required("name", " Juan ").unwrap(), "Juan");
        assert!(validate_required("name", "").is_err());
        assert!(validate_required("name", "   ").is_err());
        assert!(validate_required("name", &"a".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_notes() {
        assert_eq!(validate_notes(None).unwrap(), None);
        assert_eq!(validate_notes(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_notes(Some(" sin sal ")).unwrap(),
            Some("sin sal".to_string())
        );
        assert!(validate_notes(Some(&"x".repeat(300))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(999).unwrap(), 999);

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_table_number() {
        assert!(validate_table_number(1, 12).is_ok());
        assert!(validate_table_number(12, 12).is_ok());
        assert!(validate_table_number(0, 12).is_err());
        assert!(validate_table_number(13, 12).is_err());
    }

    #[test]
    fn test_validate_amounts_are_capped() {
        assert!(validate_price("price", Money::from_units(MAX_PRICE_UNITS)).is_ok());
        assert!(matches!(
            validate_price("price", Money::from_units(MAX_PRICE_UNITS + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_tendered(Money::from_units(-5)),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(validate_tendered(Money::from_units(MAX_TENDERED_UNITS)).is_ok());
        assert!(validate_tendered(Money::from_units(MAX_TENDERED_UNITS + 1)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  LOMO ").unwrap(), "lomo");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }
}
