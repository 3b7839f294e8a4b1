//! # Sales Log
//!
//! Orders completed during this run, in completion order. Feeds the kitchen
//! queue and the end-of-day report. Nothing is persisted.

use std::sync::{Arc, Mutex};

use lomi_core::{Money, Order, OrderStatus, PaymentMethod};
use serde::Serialize;

/// Totals over the recorded orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub order_count: usize,
    pub gross_total: Money,
    pub tax_total: Money,
    /// One entry per payment method, in `PaymentMethod::ALL` order.
    pub by_method: Vec<MethodTotal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub order_count: usize,
    pub total: Money,
}

/// Shared, append-only order log.
#[derive(Debug, Clone, Default)]
pub struct SalesLog {
    orders: Arc<Mutex<Vec<Order>>>,
}

impl SalesLog {
    pub fn new() -> Self {
        SalesLog::default()
    }

    pub fn record(&self, order: Order) {
        self.orders.lock().expect("Sales log mutex poisoned").push(order);
    }

    /// All orders, most recent first.
    pub fn orders(&self) -> Vec<Order> {
        let orders = self.orders.lock().expect("Sales log mutex poisoned");
        orders.iter().rev().cloned().collect()
    }

    /// Orders the kitchen still has to prepare, oldest first.
    pub fn kitchen_queue(&self) -> Vec<Order> {
        let orders = self.orders.lock().expect("Sales log mutex poisoned");
        orders
            .iter()
            .filter(|o| o.status == OrderStatus::Preparing)
            .cloned()
            .collect()
    }

    pub fn report(&self) -> SalesReport {
        let orders = self.orders.lock().expect("Sales log mutex poisoned");

        let by_method = PaymentMethod::ALL
            .into_iter()
            .map(|method| {
                let paid: Vec<&Order> =
                    orders.iter().filter(|o| o.payment_method == method).collect();
                MethodTotal {
                    method,
                    order_count: paid.len(),
                    total: paid.iter().map(|o| o.total).sum(),
                }
            })
            .collect();

        SalesReport {
            order_count: orders.len(),
            gross_total: orders.iter().map(|o| o.total).sum(),
            tax_total: orders.iter().map(|o| o.tax).sum(),
            by_method,
        }
    }
}
