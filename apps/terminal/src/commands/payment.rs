//! # Payment Commands
//!
//! Drive the [`PaymentWorkflow`] held in the session.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  pay ──► method cash 15000 ──► next ──► doc invoice Ana;20-1-9 ──►      │
//! │                                  ▲         │                            │
//! │                                  └── back ─┘                            │
//! │                                                                         │
//! │  ──► confirm ──► Order recorded in SalesLog, cart cleared               │
//! │                                                                         │
//! │  cancel (any step before confirm) ──► checkout dropped, cart kept       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lomi_core::{
    CartTotals, DocumentType, Money, Order, PaymentMethod, PaymentStep, PaymentWorkflow,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{SalesLog, SessionState};

/// What the payment panel shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub step: PaymentStep,
    pub totals: CartTotals,
    pub method: PaymentMethod,
    pub tendered: Option<Money>,
    pub change: Money,
    pub document_type: DocumentType,
    pub billing_name: String,
    pub billing_tax_id: String,
}

impl From<&PaymentWorkflow> for CheckoutResponse {
    fn from(wf: &PaymentWorkflow) -> Self {
        CheckoutResponse {
            step: wf.step(),
            totals: wf.totals(),
            method: wf.method(),
            tendered: wf.tendered(),
            change: wf.change_preview(),
            document_type: wf.document_type(),
            billing_name: wf.billing_name().to_string(),
            billing_tax_id: wf.billing_tax_id().to_string(),
        }
    }
}

/// Opens checkout on the current cart.
///
/// A checkout already open is replaced by a fresh one on the same cart.
pub fn start_payment(session: &SessionState) -> Result<CheckoutResponse, ApiError> {
    debug!("start_payment command");

    session.with_session_mut(|s| {
        let checkout = PaymentWorkflow::begin(&s.cart)?;
        let response = CheckoutResponse::from(&checkout);
        s.checkout = Some(checkout);
        Ok(response)
    })
}

/// Chooses the payment method and, optionally, the cash received.
///
/// Without an amount the one entered before is kept. A rejected amount
/// leaves both the method and the amount as they were.
pub fn select_method(
    session: &SessionState,
    tag: &str,
    tendered: Option<&str>,
) -> Result<CheckoutResponse, ApiError> {
    debug!(tag, tendered, "select_method command");

    let method = PaymentMethod::parse(tag)
        .ok_or_else(|| ApiError::validation(format!("Unknown payment method: {}", tag)))?;
    let tendered = tendered.map(str::parse::<Money>).transpose()?;

    session.with_session_mut(|s| {
        let checkout = s.checkout_mut()?;
        let tendered = tendered.or(checkout.tendered());
        checkout.set_payment(method, tendered)?;
        Ok(CheckoutResponse::from(&*checkout))
    })
}

/// Moves on to document selection.
pub fn submit_payment(session: &SessionState) -> Result<CheckoutResponse, ApiError> {
    debug!("submit_payment command");

    session.with_session_mut(|s| {
        let checkout = s.checkout_mut()?;
        checkout.submit_payment()?;
        Ok(CheckoutResponse::from(&*checkout))
    })
}

/// Returns to payment collection.
pub fn go_back(session: &SessionState) -> Result<CheckoutResponse, ApiError> {
    debug!("go_back command");

    session.with_session_mut(|s| {
        let checkout = s.checkout_mut()?;
        checkout.back()?;
        Ok(CheckoutResponse::from(&*checkout))
    })
}

/// Chooses the document and, optionally, the billing name and tax id.
pub fn select_document(
    session: &SessionState,
    tag: &str,
    billing: Option<(&str, &str)>,
) -> Result<CheckoutResponse, ApiError> {
    debug!(tag, "select_document command");

    let document_type = DocumentType::parse(tag)
        .ok_or_else(|| ApiError::validation(format!("Unknown document type: {}", tag)))?;

    session.with_session_mut(|s| {
        let checkout = s.checkout_mut()?;
        checkout.select_document(document_type)?;
        if let Some((name, tax_id)) = billing {
            checkout.set_billing(name, tax_id)?;
        }
        Ok(CheckoutResponse::from(&*checkout))
    })
}

/// Completes the checkout.
///
/// ## Behavior
/// - Builds the order, clears the cart and closes the checkout
/// - Records the order in the sales log
/// - On error nothing changes and the checkout stays open
pub fn confirm_payment(session: &SessionState, sales: &SalesLog) -> Result<Order, ApiError> {
    debug!("confirm_payment command");

    let order = session.with_session_mut(|s| {
        let cashier = s.cashier_name().to_string();
        let checkout = s
            .checkout
            .as_mut()
            .ok_or_else(|| ApiError::payment("No payment in progress, use `pay` first"))?;
        let order = checkout.confirm(&mut s.cart, &cashier)?;
        s.checkout = None;
        Ok::<Order, ApiError>(order)
    })?;

    info!(
        order_id = %order.id,
        number = %order.number,
        total = %order.total,
        method = order.payment_method.as_str(),
        cashier = %order.cashier_name,
        "Order completed"
    );
    match serde_json::to_string(&order) {
        Ok(payload) => debug!(%payload, "Order hand-off"),
        Err(e) => tracing::error!("Failed to serialize order {}: {}", order.id, e),
    }

    sales.record(order.clone());
    Ok(order)
}

/// Drops the checkout. The cart is kept as it was.
pub fn cancel_payment(session: &SessionState) -> Result<(), ApiError> {
    debug!("cancel_payment command");

    session.with_session_mut(|s| match s.checkout.take() {
        Some(_) => Ok(()),
        None => Err(ApiError::payment("No payment in progress")),
    })
}
