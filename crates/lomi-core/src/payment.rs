//! # Payment Workflow
//!
//! Turns a frozen cart into a paid [`Order`].
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   begin(&cart)                                                          │
//! │       │  snapshot lines + totals                                        │
//! │       ▼                                                                 │
//! │  ┌───────────────────┐  submit_payment()   ┌────────────────────┐       │
//! │  │ CollectingPayment │ ──────────────────► │ CollectingDocument │       │
//! │  │  method, tendered │ ◄────────────────── │  document, billing │       │
//! │  └───────────────────┘       back()        └─────────┬──────────┘       │
//! │     cash < total:                                    │ confirm()        │
//! │     InsufficientPayment                              ▼                  │
//! │                                            ┌────────────────────┐       │
//! │     invoice without billing name/tax id:   │     Completed      │       │
//! │     ValidationError                        │  Order built,      │       │
//! │                                            │  cart cleared      │       │
//! │                                            └────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected transition leaves every input and the step untouched, so the
//! operator can correct the value and try again.

use chrono::Utc;
use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartSnapshot, CartTotals};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::order::{order_number, Order};
use crate::types::{
    BillingDetails, DocumentType, Fulfillment, OrderStatus, OrderType, PaymentMethod,
};
use crate::validation::{validate_required, validate_tendered};
use crate::DEFAULT_CASHIER_NAME;

/// Where the workflow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStep {
    CollectingPayment,
    CollectingDocument,
    Completed,
}

impl PaymentStep {
    fn describe(&self) -> &'static str {
        match self {
            PaymentStep::CollectingPayment => "collecting payment",
            PaymentStep::CollectingDocument => "collecting document",
            PaymentStep::Completed => "completed",
        }
    }
}

/// One checkout attempt for one cart snapshot.
#[derive(Debug, Clone)]
pub struct PaymentWorkflow {
    snapshot: CartSnapshot,
    step: PaymentStep,
    method: PaymentMethod,
    tendered: Option<Money>,
    document_type: DocumentType,
    billing_name: String,
    billing_tax_id: String,
}

impl PaymentWorkflow {
    /// Starts checkout on a snapshot of `cart`.
    ///
    /// ## Errors
    /// - `EmptyCart` if there is nothing to charge
    /// - `ValidationError` for a delivery order without customer name,
    ///   phone and address
    pub fn begin(cart: &Cart) -> CoreResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        if cart.order_type() == OrderType::Delivery {
            let customer = cart
                .customer()
                .ok_or_else(|| ValidationError::required("customer name"))?;
            validate_required("customer name", &customer.name)?;
            validate_required("customer phone", &customer.phone)?;
            validate_required(
                "customer address",
                customer.address.as_deref().unwrap_or_default(),
            )?;
        }

        let snapshot = cart.snapshot();
        let billing_name = snapshot
            .customer
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_default();

        Ok(PaymentWorkflow {
            snapshot,
            step: PaymentStep::CollectingPayment,
            method: PaymentMethod::default(),
            tendered: None,
            document_type: DocumentType::default(),
            billing_name,
            billing_tax_id: String::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn step(&self) -> PaymentStep {
        self.step
    }

    pub fn snapshot(&self) -> &CartSnapshot {
        &self.snapshot
    }

    pub fn totals(&self) -> CartTotals {
        self.snapshot.totals
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn tendered(&self) -> Option<Money> {
        self.tendered
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn billing_name(&self) -> &str {
        &self.billing_name
    }

    pub fn billing_tax_id(&self) -> &str {
        &self.billing_tax_id
    }

    /// Change to hand back for the cash entered so far, zero if short.
    pub fn change_preview(&self) -> Money {
        match (self.method, self.tendered) {
            (PaymentMethod::Cash, Some(tendered)) if tendered >= self.snapshot.totals.total => {
                tendered - self.snapshot.totals.total
            }
            _ => Money::zero(),
        }
    }

    // -------------------------------------------------------------------------
    // CollectingPayment
    // -------------------------------------------------------------------------

    pub fn select_method(&mut self, method: PaymentMethod) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingPayment, "choose a payment method")?;
        self.method = method;
        Ok(())
    }

    /// Records the cash handed over. `None` clears it.
    pub fn set_tendered(&mut self, amount: Option<Money>) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingPayment, "enter the amount received")?;
        if let Some(amount) = amount {
            validate_tendered(amount)?;
        }
        self.tendered = amount;
        Ok(())
    }

    /// Sets method and cash amount together. On error neither changes.
    pub fn set_payment(
        &mut self,
        method: PaymentMethod,
        tendered: Option<Money>,
    ) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingPayment, "choose a payment method")?;
        if let Some(amount) = tendered {
            validate_tendered(amount)?;
        }
        self.method = method;
        self.tendered = tendered;
        Ok(())
    }

    /// Moves to document selection.
    ///
    /// ## Errors
    /// - `InsufficientPayment` for cash when nothing or less than the total
    ///   was tendered
    pub fn submit_payment(&mut self) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingPayment, "continue to the document")?;

        if self.method == PaymentMethod::Cash {
            let required = self.snapshot.totals.total;
            match self.tendered {
                Some(tendered) if tendered >= required => {}
                tendered => return Err(CoreError::InsufficientPayment { required, tendered }),
            }
        }

        self.step = PaymentStep::CollectingDocument;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // CollectingDocument
    // -------------------------------------------------------------------------

    /// Returns to payment collection, keeping every input.
    pub fn back(&mut self) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingDocument, "go back to the payment")?;
        self.step = PaymentStep::CollectingPayment;
        Ok(())
    }

    pub fn select_document(&mut self, document_type: DocumentType) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingDocument, "choose a document")?;
        self.document_type = document_type;
        Ok(())
    }

    /// Records invoice details. Checked on [`PaymentWorkflow::confirm`].
    pub fn set_billing(&mut self, name: &str, tax_id: &str) -> CoreResult<()> {
        self.expect_step(PaymentStep::CollectingDocument, "enter billing details")?;
        self.billing_name = name.to_string();
        self.billing_tax_id = tax_id.to_string();
        Ok(())
    }

    /// Builds the order and clears `cart`.
    ///
    /// ## Errors
    /// - `ValidationError` when an invoice is requested and the billing
    ///   name or tax id is blank
    ///
    /// On error nothing changes: no order, cart untouched.
    pub fn confirm(&mut self, cart: &mut Cart, cashier_name: &str) -> CoreResult<Order> {
        self.expect_step(PaymentStep::CollectingDocument, "confirm the payment")?;

        let billing = if self.document_type.requires_billing() {
            Some(BillingDetails {
                name: validate_required("billing name", &self.billing_name)?,
                tax_id: validate_required("billing tax id", &self.billing_tax_id)?,
            })
        } else {
            None
        };

        let fulfillment = self.fulfillment()?;
        let totals = self.snapshot.totals;
        let (amount_tendered, change) = match self.method {
            PaymentMethod::Cash => (self.tendered, self.tendered.map(|t| t - totals.total)),
            PaymentMethod::Card | PaymentMethod::Transfer => (None, None),
        };
        let cashier_name = match cashier_name.trim() {
            "" => DEFAULT_CASHIER_NAME.to_string(),
            name => name.to_string(),
        };
        let created_at = Utc::now();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            number: order_number(created_at),
            lines: self.snapshot.lines.clone(),
            fulfillment,
            payment_method: self.method,
            document_type: self.document_type,
            billing,
            subtotal: totals.subtotal,
            tax: totals.tax,
            delivery_fee: totals.delivery_fee,
            total: totals.total,
            amount_tendered,
            change,
            status: OrderStatus::Preparing,
            created_at,
            cashier_name,
        };

        self.step = PaymentStep::Completed;
        cart.clear();

        Ok(order)
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn expect_step(&self, expected: PaymentStep, action: &str) -> CoreResult<()> {
        if self.step != expected {
            return Err(CoreError::InvalidTransition {
                action: action.to_string(),
                state: self.step.describe().to_string(),
            });
        }
        Ok(())
    }

    fn fulfillment(&self) -> CoreResult<Fulfillment> {
        let snapshot = &self.snapshot;
        let customer_name = match self.billing_name.trim() {
            "" => snapshot.customer.as_ref().map(|c| c.name.clone()),
            name => Some(name.to_string()),
        };

        Ok(match snapshot.order_type {
            OrderType::DineIn => Fulfillment::DineIn {
                table_number: snapshot.table_number,
            },
            OrderType::Takeaway => Fulfillment::Takeaway { customer_name },
            OrderType::Delivery => {
                let customer = snapshot
                    .customer
                    .as_ref()
                    .ok_or_else(|| ValidationError::required("customer name"))?;
                Fulfillment::Delivery {
                    customer_name: customer.name.clone(),
                    customer_phone: customer.phone.clone(),
                    customer_address: customer
                        .address
                        .clone()
                        .ok_or_else(|| ValidationError::required("customer address"))?,
                }
            }
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Pricing;
    use crate::types::{Product, ProductCategory, TaxRate};

    fn product(units: i64) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Lomito".to_string(),
            description: String::new(),
            price: Money::from_units(units),
            category: ProductCategory::Lomitos,
            extras: Vec::new(),
            exclusions: Vec::new(),
            is_combo: false,
            is_best_seller: false,
            is_available: true,
            preparation_time: Some(15),
        }
    }

    /// A tax-free dine-in cart whose total is exactly `total_units`.
    fn cart_totalling(total_units: i64) -> Cart {
        let mut cart = Cart::with_pricing(Pricing {
            tax_rate: TaxRate::zero(),
            ..Pricing::default()
        });
        cart.add_line(&product(total_units), &[], &[], None).unwrap();
        assert_eq!(cart.compute_totals().total, Money::from_units(total_units));
        cart
    }

    #[test]
    fn test_begin_rejects_empty_cart() {
        let cart = Cart::new();
        assert!(matches!(
            PaymentWorkflow::begin(&cart),
            Err(CoreError::EmptyCart)
        ));
    }

    #[test]
    fn test_begin_requires_delivery_details() {
        let mut cart = Cart::new();
        cart.add_line(&product(1000), &[], &[], None).unwrap();
        cart.set_order_type(OrderType::Delivery);
        assert!(PaymentWorkflow::begin(&cart).is_err());

        cart.set_customer_info("Juan", "11 5555-0000", None).unwrap();
        assert!(matches!(
            PaymentWorkflow::begin(&cart),
            Err(CoreError::Validation(ValidationError::Required { field })) if field == "customer address"
        ));

        cart.set_customer_info("Juan", "11 5555-0000", Some("Belgrano 12"))
            .unwrap();
        assert!(PaymentWorkflow::begin(&cart).is_ok());
    }

    #[test]
    fn test_cash_below_total_is_insufficient() {
        let cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        wf.set_tendered(Some(Money::from_units(9999))).unwrap();
        let err = wf.submit_payment().unwrap_err();

        assert!(matches!(err, CoreError::InsufficientPayment { .. }));
        assert_eq!(wf.step(), PaymentStep::CollectingPayment);
        assert_eq!(wf.tendered(), Some(Money::from_units(9999)));
    }

    #[test]
    fn test_cash_without_amount_is_insufficient() {
        let cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        assert!(matches!(
            wf.submit_payment(),
            Err(CoreError::InsufficientPayment { tendered: None, .. })
        ));
    }

    #[test]
    fn test_exact_cash_gives_zero_change() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        wf.set_tendered(Some(Money::from_units(10000))).unwrap();
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();

        assert_eq!(order.change, Some(Money::zero()));
        assert_eq!(order.amount_tendered, Some(Money::from_units(10000)));
    }

    #[test]
    fn test_cash_over_total_gives_change() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        wf.set_tendered(Some(Money::from_units(12000))).unwrap();
        assert_eq!(wf.change_preview(), Money::from_units(2000));
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();

        assert_eq!(order.change, Some(Money::from_units(2000)));
    }

    #[test]
    fn test_rejected_tendered_keeps_previous_inputs() {
        let cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        wf.set_tendered(Some(Money::from_units(12000))).unwrap();

        assert!(wf.set_tendered(Some(Money::from_units(-5))).is_err());
        assert!(wf
            .set_tendered(Some(Money::from_units(crate::MAX_TENDERED_UNITS + 1)))
            .is_err());
        assert!(wf
            .set_payment(PaymentMethod::Card, Some(Money::from_units(-5)))
            .is_err());

        assert_eq!(wf.method(), PaymentMethod::Cash);
        assert_eq!(wf.tendered(), Some(Money::from_units(12000)));

        wf.set_payment(PaymentMethod::Transfer, None).unwrap();
        assert_eq!(wf.method(), PaymentMethod::Transfer);
        assert_eq!(wf.tendered(), None);
    }

    #[test]
    fn test_non_cash_needs_no_amount() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();

        assert_eq!(order.payment_method, PaymentMethod::Card);
        assert_eq!(order.amount_tendered, None);
        assert_eq!(order.change, None);
    }

    #[test]
    fn test_invoice_requires_billing_details() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        wf.select_method(PaymentMethod::Transfer).unwrap();
        wf.submit_payment().unwrap();

        wf.select_document(DocumentType::Invoice).unwrap();
        wf.set_billing("", "20-12345678-9").unwrap();
        assert!(matches!(
            wf.confirm(&mut cart, "María"),
            Err(CoreError::Validation(_))
        ));
        assert_eq!(wf.step(), PaymentStep::CollectingDocument);
        assert!(!cart.is_empty());

        wf.set_billing("Comercial SRL", "20-12345678-9").unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();
        assert_eq!(
            order.billing,
            Some(BillingDetails {
                name: "Comercial SRL".to_string(),
                tax_id: "20-12345678-9".to_string(),
            })
        );
    }

    #[test]
    fn test_both_requires_tax_id() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();

        wf.select_document(DocumentType::Both).unwrap();
        wf.set_billing("Comercial SRL", "   ").unwrap();
        assert!(wf.confirm(&mut cart, "María").is_err());
    }

    #[test]
    fn test_back_keeps_inputs() {
        let cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        wf.set_tendered(Some(Money::from_units(15000))).unwrap();
        wf.submit_payment().unwrap();
        wf.select_document(DocumentType::Invoice).unwrap();
        wf.set_billing("Ana", "27-1-1").unwrap();

        wf.back().unwrap();
        assert_eq!(wf.step(), PaymentStep::CollectingPayment);
        assert_eq!(wf.tendered(), Some(Money::from_units(15000)));
        assert_eq!(wf.document_type(), DocumentType::Invoice);
        assert_eq!(wf.billing_name(), "Ana");
        assert_eq!(wf.billing_tax_id(), "27-1-1");
    }

    #[test]
    fn test_inputs_rejected_in_wrong_step() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        assert!(matches!(
            wf.select_document(DocumentType::Invoice),
            Err(CoreError::InvalidTransition { .. })
        ));
        assert!(wf.back().is_err());
        assert!(wf.confirm(&mut cart, "María").is_err());

        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();
        assert!(wf.select_method(PaymentMethod::Cash).is_err());
        assert_eq!(wf.method(), PaymentMethod::Card);
    }

    #[test]
    fn test_completion_clears_cart_once() {
        let mut cart = Cart::new();
        cart.add_line(&product(1000), &[], &[], None).unwrap();
        cart.set_order_type(OrderType::Delivery);
        cart.set_customer_info("Juan", "11 5555-0000", Some("Belgrano 12"))
            .unwrap();

        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "").unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.order_type(), OrderType::DineIn);
        assert!(cart.customer().is_none());
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.cashier_name, DEFAULT_CASHIER_NAME);
        assert_eq!(order.delivery_fee, Money::from_units(500));
        assert_eq!(
            order.fulfillment,
            Fulfillment::Delivery {
                customer_name: "Juan".to_string(),
                customer_phone: "11 5555-0000".to_string(),
                customer_address: "Belgrano 12".to_string(),
            }
        );

        assert_eq!(wf.step(), PaymentStep::Completed);
        assert!(matches!(
            wf.confirm(&mut cart, "María"),
            Err(CoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_snapshot_ignores_later_cart_changes() {
        let mut cart = cart_totalling(10000);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();

        cart.add_line(&product(5000), &[], &[], None).unwrap();

        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();

        assert_eq!(order.total, Money::from_units(10000));
        assert_eq!(order.lines.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_dine_in_order_carries_table() {
        let mut cart = cart_totalling(10000);
        cart.set_table_number(7);
        let mut wf = PaymentWorkflow::begin(&cart).unwrap();
        wf.select_method(PaymentMethod::Card).unwrap();
        wf.submit_payment().unwrap();
        let order = wf.confirm(&mut cart, "María").unwrap();

        assert_eq!(order.fulfillment.table_number(), Some(7));
        assert!(order.number.starts_with("ORD-"));
        assert_eq!(order.preparation_estimate(), Some(15));
    }
}
