//! Scenario: counter checkout from catalog to paid order
//!
//! # Invariants under test (purely in-process)
//!
//! 1. A lomito at 5000 with an 800 extra, quantity 2, dine-in, prices at
//!    subtotal 11600, tax 2436, total 14036.
//! 2. Cash below the total never reaches document selection; exact cash and
//!    overpayment produce change of 0 and the difference.
//! 3. A completed checkout yields exactly one `preparing` order and leaves an
//!    empty dine-in cart with no customer.
//! 4. An invoice blocks completion until billing name and tax id are given.

use lomi_core::{
    Cart, Catalog, CoreError, DocumentType, Fulfillment, Money, OrderStatus, OrderType,
    PaymentMethod, PaymentStep, PaymentWorkflow,
};

const MENU: &str = r#"[
  {
    "id": "lomo-completo",
    "name": "Lomito completo",
    "description": "Lomo, jamón, queso, huevo, lechuga y tomate",
    "price": 5000,
    "category": "lomitos",
    "extras": [
      { "id": "extra-huevo", "name": "Huevo extra", "price": 800 },
      { "id": "extra-cheddar", "name": "Cheddar", "price": 600 }
    ],
    "exclusions": [ { "id": "sin-tomate", "name": "Sin tomate" } ],
    "is_best_seller": true,
    "is_available": true,
    "preparation_time": 15
  },
  {
    "id": "gaseosa",
    "name": "Gaseosa 500ml",
    "price": 1500,
    "category": "bebidas",
    "is_available": true
  },
  {
    "id": "pancho-xl",
    "name": "Pancho XL",
    "price": 2500,
    "category": "panchos",
    "is_available": false
  }
]"#;

fn catalog() -> Catalog {
    Catalog::from_json(MENU).expect("demo menu must parse")
}

/// Builds the 14036 dine-in cart from the pricing scenario.
fn lomito_cart(catalog: &Catalog) -> Cart {
    let lomo = catalog.require("lomo-completo").unwrap();
    let huevo = lomo.extra("extra-huevo").unwrap().clone();

    let mut cart = Cart::new();
    let line = cart.add_line(lomo, &[huevo], &[], None).unwrap();
    cart.set_quantity(&line, 2).unwrap();
    cart
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[test]
fn lomito_with_extra_prices_at_14036() {
    let cart = lomito_cart(&catalog());
    let totals = cart.compute_totals();

    assert_eq!(totals.subtotal, Money::from_units(11600));
    assert_eq!(totals.delivery_fee, Money::zero());
    assert_eq!(totals.tax, Money::from_units(2436));
    assert_eq!(totals.total, Money::from_units(14036));
}

#[test]
fn unavailable_product_is_rejected() {
    let catalog = catalog();
    let mut cart = Cart::new();
    let pancho = catalog.require("pancho-xl").unwrap();

    assert!(matches!(
        cart.add_line(pancho, &[], &[], None),
        Err(CoreError::InvalidProduct { .. })
    ));
    assert!(cart.is_empty());
}

// ---------------------------------------------------------------------------
// Cash gate
// ---------------------------------------------------------------------------

#[test]
fn cash_gate_and_change() {
    let catalog = catalog();
    let total = Money::from_units(14036);

    // Short by one
    let mut cart = lomito_cart(&catalog);
    let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
    checkout
        .set_tendered(Some(total - Money::from_units(1)))
        .unwrap();
    assert!(matches!(
        checkout.submit_payment(),
        Err(CoreError::InsufficientPayment { .. })
    ));
    assert_eq!(checkout.step(), PaymentStep::CollectingPayment);

    // Operator corrects the amount and the same workflow proceeds
    checkout
        .set_tendered(Some(total + Money::from_units(2000)))
        .unwrap();
    checkout.submit_payment().unwrap();
    let order = checkout.confirm(&mut cart, "María Cajera").unwrap();
    assert_eq!(order.change, Some(Money::from_units(2000)));

    // Exact amount
    let mut cart = lomito_cart(&catalog);
    let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
    checkout.set_tendered(Some(total)).unwrap();
    checkout.submit_payment().unwrap();
    let order = checkout.confirm(&mut cart, "María Cajera").unwrap();
    assert_eq!(order.change, Some(Money::zero()));
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[test]
fn delivery_checkout_produces_one_preparing_order_and_resets_cart() {
    let catalog = catalog();
    let mut cart = lomito_cart(&catalog);
    cart.add_line(catalog.require("gaseosa").unwrap(), &[], &[], None)
        .unwrap();
    cart.set_order_type(OrderType::Delivery);
    cart.set_customer_info("Juan Pérez", "+54 11 1234-5678", Some("Corrientes 1234"))
        .unwrap();

    // (11600 + 1500) × 1.21 + 500
    let expected_total = Money::from_units(16351);
    assert_eq!(cart.compute_totals().total, expected_total);

    let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
    checkout.select_method(PaymentMethod::Transfer).unwrap();
    checkout.submit_payment().unwrap();
    let order = checkout.confirm(&mut cart, "María Cajera").unwrap();

    assert_eq!(order.status, OrderStatus::Preparing);
    assert_eq!(order.total, expected_total);
    assert_eq!(order.delivery_fee, Money::from_units(500));
    assert_eq!(order.order_type(), OrderType::Delivery);
    assert!(matches!(order.fulfillment, Fulfillment::Delivery { .. }));
    assert_eq!(order.unit_count(), 3);

    assert!(cart.is_empty());
    assert_eq!(cart.order_type(), OrderType::DineIn);
    assert!(cart.customer().is_none());
    assert_eq!(cart.compute_totals().total, Money::zero());

    // A second confirm on the same workflow cannot mint another order
    assert!(checkout.confirm(&mut cart, "María Cajera").is_err());
}

#[test]
fn invoice_blocks_until_billing_is_complete() {
    let mut cart = lomito_cart(&catalog());
    let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
    checkout.select_method(PaymentMethod::Card).unwrap();
    checkout.submit_payment().unwrap();
    checkout.select_document(DocumentType::Invoice).unwrap();

    assert!(matches!(
        checkout.confirm(&mut cart, "María Cajera"),
        Err(CoreError::Validation(_))
    ));
    assert!(!cart.is_empty(), "cart must survive a rejected confirmation");

    checkout
        .set_billing("Distribuidora Norte SA", "30-71234567-1")
        .unwrap();
    let order = checkout.confirm(&mut cart, "María Cajera").unwrap();
    assert_eq!(order.document_type, DocumentType::Invoice);
    assert_eq!(order.billing.unwrap().tax_id, "30-71234567-1");
}

#[test]
fn order_serializes_for_downstream_consumers() {
    let mut cart = lomito_cart(&catalog());
    cart.set_table_number(3);
    let mut checkout = PaymentWorkflow::begin(&cart).unwrap();
    checkout.set_tendered(Some(Money::from_units(15000))).unwrap();
    checkout.submit_payment().unwrap();
    let order = checkout.confirm(&mut cart, "María Cajera").unwrap();

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["status"], "preparing");
    assert_eq!(json["payment_method"], "cash");
    assert_eq!(json["document_type"], "receipt");
    assert_eq!(json["fulfillment"]["order_type"], "dine_in");
    assert_eq!(json["fulfillment"]["table_number"], 3);
    let change: Money = serde_json::from_value(json["change"].clone()).unwrap();
    assert_eq!(change, Money::from_units(964));
}
