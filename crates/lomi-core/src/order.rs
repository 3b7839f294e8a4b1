//! # Order Record
//!
//! The immutable record produced once per successful payment. It is the only
//! artifact handed to kitchen, reporting and printing collaborators.
//!
//! ## Dual-Key Identity
//! - `id`: UUID v4, unique, used for identity and hand-off
//! - `number`: `ORD-NNNNNN`, last six digits of the creation time in
//!   milliseconds; short enough to call out at the counter, may repeat

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::money::Money;
use crate::types::{
    BillingDetails, DocumentType, Fulfillment, OrderStatus, OrderType, PaymentMethod,
};

/// A paid order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    pub number: String,
    pub lines: Vec<CartLine>,
    /// Channel plus the table or customer fields it needs.
    pub fulfillment: Fulfillment,
    pub payment_method: PaymentMethod,
    pub document_type: DocumentType,
    /// Present when an invoice was requested.
    pub billing: Option<BillingDetails>,
    pub subtotal: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    pub total: Money,
    /// Cash only.
    pub amount_tendered: Option<Money>,
    /// Cash only: `amount_tendered - total`.
    pub change: Option<Money>,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub cashier_name: String,
}

impl Order {
    pub fn order_type(&self) -> OrderType {
        self.fulfillment.order_type()
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Longest preparation time among the ordered products, in minutes.
    pub fn preparation_estimate(&self) -> Option<u32> {
        self.lines
            .iter()
            .filter_map(|l| l.product.preparation_time)
            .max()
    }
}

/// Formats the display number of an order created at `at`.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use lomi_core::order::order_number;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
/// assert_eq!(order_number(at), "ORD-123456");
/// ```
pub fn order_number(at: DateTime<Utc>) -> String {
    format!("ORD-{:06}", at.timestamp_millis().rem_euclid(1_000_000))
}
