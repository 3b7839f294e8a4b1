//! # lomi-core: Pure Business Logic for Lomi POS
//!
//! Cart pricing, the payment workflow and the order record of a
//! single-location restaurant point of sale. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lomi POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Terminal (apps/terminal)                        │   │
//! │  │    products ──► add / qty ──► pay ──► doc ──► confirm          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lomi-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐  │   │
//! │  │   │ catalog │ │  cart   │ │ payment │ │  order  │ │  money  │  │   │
//! │  │   │ Product │ │CartLine │ │Workflow │ │  Order  │ │  Money  │  │   │
//! │  │   │ search  │ │ totals  │ │  steps  │ │ number  │ │ TaxRate │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, OrderType, PaymentMethod, etc.)
//! - [`money`] - Exact decimal money
//! - [`catalog`] - Read-only product list and search
//! - [`cart`] - Cart engine and derived totals
//! - [`payment`] - Payment workflow state machine
//! - [`order`] - The finalized order record
//! - [`auth`] - Static staff directory for the login screen
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use lomi_core::{Cart, Money, PaymentMethod, PaymentWorkflow, Product, ProductCategory};
//!
//! let lomito = Product {
//!     id: "lomo-1".into(),
//!     name: "Lomito completo".into(),
//!     description: String::new(),
//!     price: Money::from_units(5000),
//!     category: ProductCategory::Lomitos,
//!     extras: vec![],
//!     exclusions: vec![],
//!     is_combo: false,
//!     is_best_seller: true,
//!     is_available: true,
//!     preparation_time: Some(15),
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_line(&lomito, &[], &[], None).unwrap();
//! assert_eq!(cart.compute_totals().total, Money::from_units(6050));
//!
//! let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
//! checkout.select_method(PaymentMethod::Card).unwrap();
//! checkout.submit_payment().unwrap();
//! let order = checkout.confirm(&mut cart, "María").unwrap();
//!
//! assert_eq!(order.total, Money::from_units(6050));
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::StaffDirectory;
pub use cart::{Cart, CartLine, CartSnapshot, CartTotals, Pricing};
pub use catalog::{Catalog, ProductQuery};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::Order;
pub use payment::{PaymentStep, PaymentWorkflow};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// IVA in basis points (21%).
pub const TAX_RATE_BPS: u32 = 2100;

/// Flat delivery surcharge, in whole currency units.
pub const DELIVERY_FEE_UNITS: i64 = 500;

/// Maximum lines allowed in a single cart.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches typos such as 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest price, extra or delivery fee accepted, in whole currency units.
///
/// A full cart at this price stays far inside the decimal range.
pub const MAX_PRICE_UNITS: i64 = 1_000_000_000;

/// Largest cash amount the counter accepts, in whole currency units.
pub const MAX_TENDERED_UNITS: i64 = 1_000_000_000_000_000;

/// Cashier name stamped on orders taken without a logged-in user.
pub const DEFAULT_CASHIER_NAME: &str = "Cajero";
