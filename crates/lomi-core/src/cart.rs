//! # Cart Engine
//!
//! Holds the lines of one in-progress order and derives its totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Operation               Cart Change           │
//! │  ───────────────          ─────────               ───────────           │
//! │                                                                         │
//! │  Tap product ────────────► add_line() ──────────► lines.push(line)     │
//! │                                                                         │
//! │  +/- on a line ──────────► set_quantity() ──────► line.qty = n         │
//! │                                                  (n <= 0 removes)      │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_line() ───────► lines.retain(..)     │
//! │                                                                         │
//! │  Salon/Takeaway/Delivery ► set_order_type() ────► order_type = t       │
//! │                                                                         │
//! │  Any render ─────────────► compute_totals() ────► (read only)          │
//! │                                                                         │
//! │  Totals are never stored: every call recomputes them from the lines.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Pricing
//! ```text
//! unit price  = product.price + Σ extras.price
//! line total  = unit price × quantity
//! subtotal    = Σ line totals
//! tax         = subtotal × 21%
//! delivery    = 500 if order type is delivery, else 0
//! total       = subtotal + tax + delivery
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CustomerInfo, Exclusion, Extra, OrderType, Product, TaxRate};
use crate::validation::{validate_notes, validate_quantity, validate_required};
use crate::{DELIVERY_FEE_UNITS, MAX_CART_LINES};

// =============================================================================
// Pricing Rules
// =============================================================================

/// Tax rate and delivery fee applied by a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pricing {
    pub tax_rate: TaxRate,
    /// Flat surcharge for delivery orders.
    pub delivery_fee: Money,
}

impl Default for Pricing {
    /// 21% IVA and a 500 delivery fee.
    fn default() -> Self {
        Pricing {
            tax_rate: TaxRate::default(),
            delivery_fee: Money::from_units(DELIVERY_FEE_UNITS),
        }
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product configuration at a given quantity.
///
/// ## Design Notes
/// - `product`: frozen copy of the catalog record at add time
/// - `extras`: copied by value, each applied once per unit
/// - `quantity`: always >= 1, a line that would reach 0 is removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub id: String,
    pub product: Product,
    pub quantity: u32,
    pub extras: Vec<Extra>,
    pub exclusions: Vec<Exclusion>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Price of one unit including its extras.
    pub fn unit_price(&self) -> Money {
        self.product.price + self.extras.iter().map(|e| e.price).sum::<Money>()
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived money figures of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub unit_count: u32,
    pub subtotal: Money,
    pub tax: Money,
    pub delivery_fee: Money,
    pub total: Money,
}

// =============================================================================
// Cart
// =============================================================================

/// The cart of the active terminal session.
///
/// ## Invariants
/// - Every line has quantity in `1..=MAX_ITEM_QUANTITY`
/// - At most `MAX_CART_LINES` lines
/// - Totals are derived on demand, never stored
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    order_type: OrderType,
    table_number: Option<u32>,
    customer: Option<CustomerInfo>,
    #[serde(skip)]
    pricing: Pricing,
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

impl Cart {
    /// Creates an empty dine-in cart with default pricing.
    pub fn new() -> Self {
        Cart::with_pricing(Pricing::default())
    }

    /// Creates an empty dine-in cart with the given pricing rules.
    pub fn with_pricing(pricing: Pricing) -> Self {
        Cart {
            lines: Vec::new(),
            order_type: OrderType::default(),
            table_number: None,
            customer: None,
            pricing,
        }
    }

    // -------------------------------------------------------------------------
    // Line operations
    // -------------------------------------------------------------------------

    /// Appends a new line with quantity 1 and returns its id.
    ///
    /// ## Behavior
    /// - Never merges with an existing line, even an identical one
    /// - Product and extras are copied, later catalog edits do not reprice
    /// - Repeated extras/exclusions (same id) are kept once
    ///
    /// ## Errors
    /// - `InvalidProduct` if the product is unavailable
    /// - `CartTooLarge` if the cart already holds `MAX_CART_LINES` lines
    pub fn add_line(
        &mut self,
        product: &Product,
        extras: &[Extra],
        exclusions: &[Exclusion],
        notes: Option<&str>,
    ) -> CoreResult<String> {
        if !product.is_available {
            return Err(CoreError::InvalidProduct {
                product_id: product.id.clone(),
            });
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let notes = validate_notes(notes)?;

        let mut chosen_extras: Vec<Extra> = Vec::with_capacity(extras.len());
        for extra in extras {
            if !chosen_extras.iter().any(|e| e.id == extra.id) {
                chosen_extras.push(extra.clone());
            }
        }

        let mut chosen_exclusions: Vec<Exclusion> = Vec::with_capacity(exclusions.len());
        for exclusion in exclusions {
            if !chosen_exclusions.iter().any(|e| e.id == exclusion.id) {
                chosen_exclusions.push(exclusion.clone());
            }
        }

        let id = Uuid::new_v4().to_string();
        self.lines.push(CartLine {
            id: id.clone(),
            product: product.clone(),
            quantity: 1,
            extras: chosen_extras,
            exclusions: chosen_exclusions,
            notes,
            added_at: Utc::now(),
        });

        Ok(id)
    }

    /// Removes a line. Absent ids are ignored.
    pub fn remove_line(&mut self, line_id: &str) {
        self.lines.retain(|l| l.id != line_id);
    }

    /// Replaces the quantity of a line.
    ///
    /// ## Behavior
    /// - `qty <= 0`: same as [`Cart::remove_line`]
    /// - Absent id: no-op, whatever the quantity
    /// - `qty > MAX_ITEM_QUANTITY`: `ValidationError`, line unchanged
    pub fn set_quantity(&mut self, line_id: &str, qty: i64) -> CoreResult<()> {
        if qty <= 0 {
            self.remove_line(line_id);
            return Ok(());
        }

        let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) else {
            return Ok(());
        };
        line.quantity = validate_quantity(qty)?;

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Order metadata
    // -------------------------------------------------------------------------

    /// Switches the fulfillment channel. Customer and table fields are kept.
    pub fn set_order_type(&mut self, order_type: OrderType) {
        self.order_type = order_type;
    }

    pub fn set_table_number(&mut self, table: u32) {
        self.table_number = Some(table);
    }

    pub fn clear_table_number(&mut self) {
        self.table_number = None;
    }

    /// Stores customer contact details from the delivery form.
    ///
    /// Name and phone are required. A missing or blank address keeps the
    /// address already stored.
    pub fn set_customer_info(
        &mut self,
        name: &str,
        phone: &str,
        address: Option<&str>,
    ) -> CoreResult<()> {
        let name = validate_required("customer name", name)?;
        let phone = validate_required("customer phone", phone)?;
        let address = match address.map(str::trim).filter(|a| !a.is_empty()) {
            Some(address) => Some(validate_required("customer address", address)?),
            None => self.customer.as_ref().and_then(|c| c.address.clone()),
        };

        self.customer = Some(CustomerInfo {
            name,
            phone,
            address,
        });
        Ok(())
    }

    pub fn clear_customer_info(&mut self) {
        self.customer = None;
    }

    /// Empties the cart and resets it to a fresh dine-in order.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.order_type = OrderType::default();
        self.table_number = None;
        self.customer = None;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    pub fn customer(&self) -> Option<&CustomerInfo> {
        self.customer.as_ref()
    }

    pub fn pricing(&self) -> Pricing {
        self.pricing
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Derives subtotal, tax, delivery fee and total from the current lines.
    pub fn compute_totals(&self) -> CartTotals {
        let subtotal: Money = self.lines.iter().map(CartLine::line_total).sum();
        let tax = subtotal.calculate_tax(self.pricing.tax_rate);
        let delivery_fee = match self.order_type {
            OrderType::Delivery => self.pricing.delivery_fee,
            OrderType::DineIn | OrderType::Takeaway => Money::zero(),
        };

        CartTotals {
            line_count: self.lines.len(),
            unit_count: self.lines.iter().map(|l| l.quantity).sum(),
            subtotal,
            tax,
            delivery_fee,
            total: subtotal + tax + delivery_fee,
        }
    }

    /// Frozen copy of everything checkout needs.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            lines: self.lines.clone(),
            order_type: self.order_type,
            table_number: self.table_number,
            customer: self.customer.clone(),
            totals: self.compute_totals(),
        }
    }
}

/// A cart frozen at the moment checkout started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub order_type: OrderType,
    pub table_number: Option<u32>,
    pub customer: Option<CustomerInfo>,
    pub totals: CartTotals,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductCategory;
    use crate::MAX_ITEM_QUANTITY;
    use proptest::prelude::*;

    fn extra(id: &str, units: i64) -> Extra {
        Extra {
            id: id.to_string(),
            name: format!("Extra {}", id),
            price: Money::from_units(units),
        }
    }

    fn product(id: &str, units: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: String::new(),
            price: Money::from_units(units),
            category: ProductCategory::Lomitos,
            extras: vec![extra("e1", 800)],
            exclusions: vec![Exclusion {
                id: "x1".to_string(),
                name: "Sin tomate".to_string(),
            }],
            is_combo: false,
            is_best_seller: false,
            is_available: true,
            preparation_time: None,
        }
    }

    #[test]
    fn test_scenario_line_with_extra() {
        let mut cart = Cart::new();
        let p1 = product("P1", 5000);

        let id = cart.add_line(&p1, &[extra("E1", 800)], &[], None).unwrap();
        cart.set_quantity(&id, 2).unwrap();

        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Money::from_units(11600));
        assert_eq!(totals.delivery_fee, Money::zero());
        assert_eq!(totals.tax, Money::from_units(2436));
        assert_eq!(totals.total, Money::from_units(14036));
    }

    #[test]
    fn test_add_never_merges() {
        let mut cart = Cart::new();
        let p = product("1", 1000);

        let a = cart.add_line(&p, &[], &[], None).unwrap();
        let b = cart.add_line(&p, &[], &[], None).unwrap();

        assert_ne!(a, b);
        assert_eq!(cart.lines().len(), 2);
        assert!(cart.lines().iter().all(|l| l.quantity == 1));
    }

    #[test]
    fn test_add_unavailable_product_fails() {
        let mut cart = Cart::new();
        let mut p = product("1", 1000);
        p.is_available = false;

        let err = cart.add_line(&p, &[], &[], None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidProduct { product_id } if product_id == "1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_collapses_repeated_modifiers() {
        let mut cart = Cart::new();
        let p = product("1", 1000);
        let x = p.exclusions[0].clone();

        let id = cart
            .add_line(&p, &[extra("e1", 800), extra("e1", 800)], &[x.clone(), x], None)
            .unwrap();

        let line = cart.line(&id).unwrap();
        assert_eq!(line.extras.len(), 1);
        assert_eq!(line.exclusions.len(), 1);
        assert_eq!(line.unit_price(), Money::from_units(1800));
    }

    #[test]
    fn test_exclusions_have_no_price_effect() {
        let mut cart = Cart::new();
        let p = product("1", 1000);
        cart.add_line(&p, &[], &p.exclusions, Some("bien cocido"))
            .unwrap();

        assert_eq!(cart.compute_totals().subtotal, Money::from_units(1000));
        assert_eq!(cart.lines()[0].notes.as_deref(), Some("bien cocido"));
    }

    #[test]
    fn test_snapshot_is_isolated_from_catalog_edits() {
        let mut cart = Cart::new();
        let mut p = product("1", 1000);
        cart.add_line(&p, &[], &[], None).unwrap();

        p.price = Money::from_units(9999);
        assert_eq!(cart.compute_totals().subtotal, Money::from_units(1000));
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        let p = product("1", 10);
        for _ in 0..MAX_CART_LINES {
            cart.add_line(&p, &[], &[], None).unwrap();
        }

        let err = cart.add_line(&p, &[], &[], None).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { max } if max == MAX_CART_LINES));
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let mut cart = Cart::new();
        let p = product("1", 1000);
        let a = cart.add_line(&p, &[], &[], None).unwrap();
        cart.add_line(&p, &[], &[], None).unwrap();

        cart.remove_line(&a);
        let once = cart.lines().to_vec();
        cart.remove_line(&a);

        assert_eq!(cart.lines(), once.as_slice());
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let p = product("1", 1000);
        let mut a = Cart::new();
        let id = a.add_line(&p, &[], &[], None).unwrap();
        let mut b = a.clone();

        a.set_quantity(&id, 0).unwrap();
        b.remove_line(&id);

        assert_eq!(a.lines(), b.lines());
        assert_eq!(a.compute_totals(), b.compute_totals());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let mut cart = Cart::new();
        let id = cart.add_line(&product("1", 1000), &[], &[], None).unwrap();
        cart.set_quantity(&id, -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_over_limit_is_rejected() {
        let mut cart = Cart::new();
        let id = cart.add_line(&product("1", 1000), &[], &[], None).unwrap();

        assert!(cart.set_quantity(&id, MAX_ITEM_QUANTITY + 1).is_err());
        assert_eq!(cart.line(&id).unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_unknown_line_is_noop() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000), &[], &[], None).unwrap();
        cart.set_quantity("missing", 5).unwrap();
        cart.set_quantity("missing", MAX_ITEM_QUANTITY + 1).unwrap();
        assert_eq!(cart.compute_totals().unit_count, 1);
    }

    #[test]
    fn test_delivery_fee_follows_order_type() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000), &[], &[], None).unwrap();

        cart.set_order_type(OrderType::Delivery);
        assert_eq!(cart.compute_totals().delivery_fee, Money::from_units(500));

        cart.set_order_type(OrderType::Takeaway);
        assert_eq!(cart.compute_totals().delivery_fee, Money::zero());
    }

    #[test]
    fn test_delivery_fee_on_empty_cart() {
        let mut cart = Cart::new();
        cart.set_order_type(OrderType::Delivery);
        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.total, Money::from_units(500));
    }

    #[test]
    fn test_switching_order_type_keeps_customer() {
        let mut cart = Cart::new();
        cart.set_order_type(OrderType::Delivery);
        cart.set_customer_info("Juan", "11 1234-5678", Some("Av. Siempreviva 742"))
            .unwrap();
        cart.set_order_type(OrderType::DineIn);

        assert_eq!(cart.customer().unwrap().name, "Juan");
    }

    #[test]
    fn test_set_customer_info_requires_name_and_phone() {
        let mut cart = Cart::new();
        assert!(cart.set_customer_info("", "123456", None).is_err());
        assert!(cart.set_customer_info("Juan", "  ", None).is_err());
        assert!(cart.customer().is_none());
    }

    #[test]
    fn test_set_customer_info_keeps_previous_address() {
        let mut cart = Cart::new();
        cart.set_customer_info("Juan", "123456", Some("San Martín 100"))
            .unwrap();
        cart.set_customer_info("Juana", "654321", None).unwrap();

        let customer = cart.customer().unwrap();
        assert_eq!(customer.name, "Juana");
        assert_eq!(customer.address.as_deref(), Some("San Martín 100"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_line(&product("1", 1000), &[], &[], None).unwrap();
        cart.set_order_type(OrderType::Delivery);
        cart.set_table_number(4);
        cart.set_customer_info("Juan", "123456", Some("Calle 1"))
            .unwrap();

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.order_type(), OrderType::DineIn);
        assert_eq!(cart.table_number(), None);
        assert!(cart.customer().is_none());
        assert_eq!(cart.compute_totals().total, Money::zero());
    }

    #[test]
    fn test_custom_pricing() {
        let pricing = Pricing {
            tax_rate: TaxRate::from_bps(1050),
            delivery_fee: Money::from_units(700),
        };
        let mut cart = Cart::with_pricing(pricing);
        cart.add_line(&product("1", 1000), &[], &[], None).unwrap();
        cart.set_order_type(OrderType::Delivery);

        let totals = cart.compute_totals();
        assert_eq!(totals.tax, Money::from_units(105));
        assert_eq!(totals.total, Money::from_units(1805));

        cart.clear();
        assert_eq!(cart.pricing(), pricing);
    }

    // -------------------------------------------------------------------------
    // Property tests
    // -------------------------------------------------------------------------

    #[derive(Debug, Clone)]
    enum Op {
        Add { cents: i64, extras: Vec<i64> },
        Remove(usize),
        SetQuantity(usize, i64),
        SetOrderType(OrderType),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0i64..1_000_000, prop::collection::vec(0i64..50_000, 0..3))
                .prop_map(|(cents, extras)| Op::Add { cents, extras }),
            (0usize..8).prop_map(Op::Remove),
            (0usize..8, -2i64..30).prop_map(|(i, q)| Op::SetQuantity(i, q)),
            prop_oneof![
                Just(OrderType::DineIn),
                Just(OrderType::Takeaway),
                Just(OrderType::Delivery)
            ]
            .prop_map(Op::SetOrderType),
        ]
    }

    fn apply(cart: &mut Cart, op: Op, seq: usize) {
        match op {
            Op::Add { cents, extras } => {
                let mut p = product(&format!("p{}", seq), 0);
                p.price = Money::from_cents(cents);
                let extras: Vec<Extra> = extras
                    .iter()
                    .enumerate()
                    .map(|(i, c)| Extra {
                        id: format!("e{}", i),
                        name: String::new(),
                        price: Money::from_cents(*c),
                    })
                    .collect();
                cart.add_line(&p, &extras, &[], None).unwrap();
            }
            Op::Remove(i) => {
                if let Some(id) = cart.lines().get(i).map(|l| l.id.clone()) {
                    cart.remove_line(&id);
                }
            }
            Op::SetQuantity(i, q) => {
                if let Some(id) = cart.lines().get(i).map(|l| l.id.clone()) {
                    cart.set_quantity(&id, q).unwrap();
                }
            }
            Op::SetOrderType(t) => cart.set_order_type(t),
        }
    }

    proptest! {
        #[test]
        fn prop_totals_are_derived_from_lines(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut cart = Cart::new();
            for (seq, op) in ops.into_iter().enumerate() {
                apply(&mut cart, op, seq);

                let totals = cart.compute_totals();
                let expected: Money = cart
                    .lines()
                    .iter()
                    .map(|l| {
                        let extras: Money = l.extras.iter().map(|e| e.price).sum();
                        (l.product.price + extras) * l.quantity
                    })
                    .sum();

                prop_assert_eq!(totals.subtotal, expected);
                prop_assert!(!totals.subtotal.is_negative());
                prop_assert_eq!(
                    totals.tax.amount(),
                    totals.subtotal.amount() * rust_decimal::Decimal::new(21, 2)
                );
                prop_assert_eq!(
                    totals.delivery_fee,
                    if cart.order_type() == OrderType::Delivery { Money::from_units(500) } else { Money::zero() }
                );
                prop_assert_eq!(totals.total, totals.subtotal + totals.tax + totals.delivery_fee);
                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
            }
        }
    }
}
