//! # Cart Commands
//!
//! Cart manipulation, addressed by the 1-based line position shown by `cart`.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Order   │       │
//! │  │  Cart    │     │          │     │  (pay)   │     │ (confirm)│       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add / qty / rm      cancel ──► back to In Cart        │
//! │                   type / table                                          │
//! │                   customer                                              │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                      clear ─────────────────────► back to Empty         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use lomi_core::validation::validate_table_number;
use lomi_core::{Cart, CartSnapshot, Catalog, Exclusion, Extra, OrderType};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{ConfigState, SessionState};

/// Product configuration requested by `add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    pub product_id: String,
    pub extra_ids: Vec<String>,
    pub exclusion_ids: Vec<String>,
    pub notes: Option<String>,
}

/// Gets the current cart contents and totals.
pub fn get_cart(session: &SessionState) -> CartSnapshot {
    debug!("get_cart command");
    session.with_session(|s| s.cart.snapshot())
}

/// Adds a configured product as a new line.
///
/// ## Behavior
/// - Extras and exclusions must be offered by the product
/// - Each call adds a line, identical configurations are not merged
pub fn add_to_cart(
    catalog: &Catalog,
    session: &SessionState,
    request: &AddRequest,
) -> Result<CartSnapshot, ApiError> {
    debug!(
        product_id = %request.product_id,
        extras = ?request.extra_ids,
        exclusions = ?request.exclusion_ids,
        "add_to_cart command"
    );

    let product = catalog.require(&request.product_id)?;
    let extras: Vec<Extra> = request
        .extra_ids
        .iter()
        .map(|id| {
            product
                .extra(id)
                .cloned()
                .ok_or_else(|| ApiError::not_found("Extra", id))
        })
        .collect::<Result<_, _>>()?;
    let exclusions: Vec<Exclusion> = request
        .exclusion_ids
        .iter()
        .map(|id| {
            product
                .exclusion(id)
                .cloned()
                .ok_or_else(|| ApiError::not_found("Exclusion", id))
        })
        .collect::<Result<_, _>>()?;

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        cart.add_line(product, &extras, &exclusions, request.notes.as_deref())?;
        Ok(cart.snapshot())
    })
}

/// Sets the quantity of the line at `position`. Zero or less removes it.
pub fn update_quantity(
    session: &SessionState,
    position: usize,
    quantity: i64,
) -> Result<CartSnapshot, ApiError> {
    debug!(position, quantity, "update_quantity command");

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        let line_id = line_id_at(cart, position)?;
        cart.set_quantity(&line_id, quantity)?;
        Ok(cart.snapshot())
    })
}

/// Removes the line at `position`.
pub fn remove_from_cart(session: &SessionState, position: usize) -> Result<CartSnapshot, ApiError> {
    debug!(position, "remove_from_cart command");

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        let line_id = line_id_at(cart, position)?;
        cart.remove_line(&line_id);
        Ok(cart.snapshot())
    })
}

/// Switches the order type. Table and customer inputs are kept.
pub fn set_order_type(session: &SessionState, tag: &str) -> Result<CartSnapshot, ApiError> {
    debug!(tag, "set_order_type command");

    let order_type = OrderType::parse(tag)
        .ok_or_else(|| ApiError::validation(format!("Unknown order type: {}", tag)))?;

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        cart.set_order_type(order_type);
        Ok(cart.snapshot())
    })
}

/// Sets the dine-in table. `0` clears it.
pub fn set_table(
    config: &ConfigState,
    session: &SessionState,
    table: u32,
) -> Result<CartSnapshot, ApiError> {
    debug!(table, "set_table command");

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        if table == 0 {
            cart.clear_table_number();
        } else {
            cart.set_table_number(validate_table_number(table, config.table_count)?);
        }
        Ok(cart.snapshot())
    })
}

/// Records customer contact details for takeaway or delivery.
pub fn set_customer(
    session: &SessionState,
    name: &str,
    phone: &str,
    address: Option<&str>,
) -> Result<CartSnapshot, ApiError> {
    debug!(name, "set_customer command");

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        cart.set_customer_info(name, phone, address)?;
        Ok(cart.snapshot())
    })
}

/// Empties the cart and resets it to dine-in.
///
/// ## When Used
/// - Customer walks away before paying
pub fn clear_cart(session: &SessionState) -> Result<CartSnapshot, ApiError> {
    debug!("clear_cart command");

    session.with_session_mut(|s| {
        let cart = s.editable_cart()?;
        cart.clear();
        Ok(cart.snapshot())
    })
}

fn line_id_at(cart: &Cart, position: usize) -> Result<String, ApiError> {
    position
        .checked_sub(1)
        .and_then(|index| cart.lines().get(index))
        .map(|line| line.id.clone())
        .ok_or_else(|| ApiError::not_found("Cart line", &position.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo_catalog;
    use crate::error::ErrorCode;
    use lomi_core::{Money, PaymentWorkflow};

    fn lomito() -> AddRequest {
        AddRequest {
            product_id: "lomo-completo".to_string(),
            extra_ids: vec!["extra-huevo".to_string()],
            ..AddRequest::default()
        }
    }

    #[test]
    fn test_add_and_update_by_position() {
        let catalog = demo_catalog().unwrap();
        let session = SessionState::default();

        add_to_cart(&catalog, &session, &lomito()).unwrap();
        let cart = update_quantity(&session, 1, 2).unwrap();

        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.totals.subtotal, Money::from_units(11600));
        assert_eq!(cart.totals.total, Money::from_units(14036));
    }

    #[test]
    fn test_unknown_extra_is_rejected() {
        let catalog = demo_catalog().unwrap();
        let session = SessionState::default();
        let request = AddRequest {
            extra_ids: vec!["extra-caviar".to_string()],
            ..lomito()
        };

        let err = add_to_cart(&catalog, &session, &request).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(get_cart(&session).lines.is_empty());
    }

    #[test]
    fn test_bad_position() {
        let session = SessionState::default();
        assert_eq!(remove_from_cart(&session, 0).unwrap_err().code, ErrorCode::NotFound);
        assert_eq!(update_quantity(&session, 3, 1).unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_quantity_zero_removes_line() {
        let catalog = demo_catalog().unwrap();
        let session = SessionState::default();
        add_to_cart(&catalog, &session, &lomito()).unwrap();

        assert!(update_quantity(&session, 1, 0).unwrap().lines.is_empty());
    }

    #[test]
    fn test_table_bounds() {
        let config = ConfigState::default();
        let session = SessionState::default();

        assert_eq!(set_table(&config, &session, 4).unwrap().table_number, Some(4));
        assert_eq!(
            set_table(&config, &session, 99).unwrap_err().code,
            ErrorCode::ValidationError
        );
        assert_eq!(set_table(&config, &session, 0).unwrap().table_number, None);
    }

    #[test]
    fn test_edits_blocked_while_paying() {
        let catalog = demo_catalog().unwrap();
        let session = SessionState::default();
        add_to_cart(&catalog, &session, &lomito()).unwrap();
        session.with_session_mut(|s| s.checkout = Some(PaymentWorkflow::begin(&s.cart).unwrap()));

        assert_eq!(clear_cart(&session).unwrap_err().code, ErrorCode::CartError);
        assert_eq!(get_cart(&session).lines.len(), 1);
    }
}
