//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Lomi POS                               │
//! │                                                                         │
//! │  Operator                    Terminal                                   │
//! │  ────────                    ────────                                   │
//! │                                                                         │
//! │  > method cash 9999                                                     │
//! │  > next                                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Cart / payment rule? ─── CoreError::InsufficientPayment ──┐     │  │
//! │  │         │                                                  │     │  │
//! │  │         ▼                                                  ▼     │  │
//! │  │  Bad input? ─────────── CoreError::Validation ──────── ApiError ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │                                                                         │
//! │  [INSUFFICIENT_PAYMENT] Insufficient payment: total $10000.00, ...      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Command errors never end the session. Only [`AppError`] (startup) does.

use std::path::PathBuf;

use clap::error::ErrorKind;
use lomi_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from a terminal command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: lomo-xl"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, extra or cart line not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Product cannot be sold right now
    InvalidProduct,

    /// Cash tendered is below the total
    InsufficientPayment,

    /// Cart operation failed
    CartError,

    /// Payment workflow rejected the action
    PaymentError,

    /// Command line could not be understood
    UnknownCommand,

    /// Internal error
    Internal,
}

impl ErrorCode {
    /// Wire tag, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidProduct => "INVALID_PRODUCT",
            ErrorCode::InsufficientPayment => "INSUFFICIENT_PAYMENT",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::PaymentError => "PAYMENT_ERROR",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }

    /// Creates a payment workflow error.
    pub fn payment(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::PaymentError, message)
    }

    /// Creates an error for an unparseable command line.
    pub fn usage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::UnknownCommand, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            e @ CoreError::InvalidProduct { .. } => {
                ApiError::new(ErrorCode::InvalidProduct, e.to_string())
            }
            e @ CoreError::InsufficientPayment { .. } => {
                ApiError::new(ErrorCode::InsufficientPayment, e.to_string())
            }
            e @ (CoreError::EmptyCart | CoreError::CartTooLarge { .. }) => {
                ApiError::cart(e.to_string())
            }
            e @ CoreError::InvalidTransition { .. } => {
                tracing::warn!(error = %e, "Rejected payment transition");
                ApiError::payment(e.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::InvalidCatalog(e) => {
                tracing::error!("Invalid catalog: {}", e);
                ApiError::new(ErrorCode::Internal, "Catalog is not usable")
            }
        }
    }
}

impl From<lomi_core::ValidationError> for ApiError {
    fn from(err: lomi_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts command-line parse failures. Help requests are handled before
/// this and never reach it.
impl From<clap::Error> for ApiError {
    fn from(err: clap::Error) -> Self {
        let code = match err.kind() {
            ErrorKind::InvalidValue | ErrorKind::ValueValidation => ErrorCode::ValidationError,
            _ => ErrorCode::UnknownCommand,
        };
        let rendered = err.to_string();
        let message = rendered.trim_end().trim_start_matches("error: ");
        ApiError::new(code, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Startup Errors
// =============================================================================

/// Failures that stop the terminal from starting or running.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),
}
