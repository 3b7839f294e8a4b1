//! # Error Types
//!
//! Domain-specific error types for lomi-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lomi-core errors (this file)                                          │
//! │  ├── CoreError        - Cart / payment rule violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Terminal errors (in app)                                              │
//! │  └── ApiError         - What the operator sees                         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Operator               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error here is recoverable: the operation is rejected, state is left
//! as it was, and the caller re-prompts.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and payment rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is marked unavailable and cannot be added to a cart.
    #[error("Product is not available: {product_id}")]
    InvalidProduct { product_id: String },

    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog data failed to parse or broke a catalog rule.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Cash tendered is below the amount due.
    ///
    /// ## User Workflow
    /// ```text
    /// Total: $14036.00
    ///      │
    ///      ▼
    /// Tendered: $14000.00
    ///      │
    ///      ▼
    /// InsufficientPayment { required: 14036, tendered: 14000 }
    ///      │
    ///      ▼
    /// UI shows: "Amount received is insufficient", asks again
    /// ```
    #[error("Insufficient payment: total {required}, tendered {}", display_tendered(.tendered))]
    InsufficientPayment {
        required: Money,
        tendered: Option<Money>,
    },

    /// Checkout was attempted with no lines in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has reached its maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// The payment workflow is not in a state that accepts this input.
    #[error("Cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn display_tendered(tendered: &Option<Money>) -> String {
    match tendered {
        Some(amount) => amount.to_string(),
        None => "nothing".to_string(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g. a tax id with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g. two catalog products with one id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
