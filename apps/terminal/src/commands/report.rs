//! # Report Commands
//!
//! Read-only views over the sales log: order history, the kitchen queue and
//! the end-of-day totals.

use lomi_core::{Money, Order, OrderStatus, OrderType, PaymentMethod};
use serde::Serialize;
use tracing::debug;

use crate::state::{SalesLog, SalesReport};

/// One row of the history list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub number: String,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub unit_count: u32,
    pub total: Money,
    /// Local time, `HH:MM`.
    pub time: String,
    pub cashier_name: String,
    /// Minutes until ready, from the slowest product.
    pub preparation_estimate: Option<u32>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        OrderSummary {
            number: order.number.clone(),
            order_type: order.order_type(),
            payment_method: order.payment_method,
            status: order.status,
            unit_count: order.unit_count(),
            total: order.total,
            time: order
                .created_at
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string(),
            cashier_name: order.cashier_name.clone(),
            preparation_estimate: order.preparation_estimate(),
        }
    }
}

/// Completed orders, most recent first.
pub fn order_history(sales: &SalesLog) -> Vec<OrderSummary> {
    debug!("order_history command");
    sales.orders().iter().map(OrderSummary::from).collect()
}

/// Orders still being prepared, oldest first.
pub fn kitchen_queue(sales: &SalesLog) -> Vec<OrderSummary> {
    debug!("kitchen_queue command");
    sales.kitchen_queue().iter().map(OrderSummary::from).collect()
}

pub fn sales_report(sales: &SalesLog) -> SalesReport {
    debug!("sales_report command");
    sales.report()
}
