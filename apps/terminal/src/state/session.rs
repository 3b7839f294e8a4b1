//! # Session State
//!
//! The active cart, the checkout in progress and the logged-in cashier.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>`: every command locks it once,
//! applies its change and releases it, so a command never observes a
//! half-applied update from another one.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Command               Session Change                                   │
//! │  ───────               ──────────────                                   │
//! │                                                                         │
//! │  add / qty / rm ─────► cart lines             (blocked while paying)    │
//! │                                                                         │
//! │  pay ────────────────► checkout = begin(&cart)                          │
//! │                                                                         │
//! │  method / next / doc ► checkout inputs                                  │
//! │                                                                         │
//! │  confirm ────────────► order built, cart cleared, checkout = None       │
//! │                                                                         │
//! │  cancel ─────────────► checkout = None        (cart kept)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use lomi_core::{Cart, PaymentWorkflow, Pricing, User, DEFAULT_CASHIER_NAME};

use crate::error::ApiError;

/// One terminal session.
#[derive(Debug)]
pub struct Session {
    pub cart: Cart,

    /// Present between `pay` and `confirm`/`cancel`.
    pub checkout: Option<PaymentWorkflow>,

    pub user: Option<User>,
}

impl Session {
    pub fn new(pricing: Pricing) -> Self {
        Session {
            cart: Cart::with_pricing(pricing),
            checkout: None,
            user: None,
        }
    }

    /// Name stamped on orders.
    pub fn cashier_name(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.name.as_str())
            .unwrap_or(DEFAULT_CASHIER_NAME)
    }

    /// Mutable access to the cart, refused while a checkout is open.
    pub fn editable_cart(&mut self) -> Result<&mut Cart, ApiError> {
        if self.checkout.is_some() {
            return Err(ApiError::cart(
                "Finish or cancel the payment before changing the cart",
            ));
        }
        Ok(&mut self.cart)
    }

    /// The open checkout, or an error telling the operator to start one.
    pub fn checkout_mut(&mut self) -> Result<&mut PaymentWorkflow, ApiError> {
        self.checkout
            .as_mut()
            .ok_or_else(|| ApiError::payment("No payment in progress, use `pay` first"))
    }
}

/// Shared session state.
///
/// ## Why Not RwLock?
/// Almost every command writes; a RwLock would add complexity for no gain.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a session with an empty cart priced with `pricing`.
    pub fn new(pricing: Pricing) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(Session::new(pricing))),
        }
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = session.with_session(|s| s.cart.compute_totals());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().expect("Session mutex poisoned");
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().expect("Session mutex poisoned");
        f(&mut session)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(Pricing::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lomi_core::{Money, Product, ProductCategory, UserRole};

    fn product() -> Product {
        Product {
            id: "papas-cheddar".to_string(),
            name: "Papas con cheddar".to_string(),
            description: String::new(),
            price: Money::from_units(2200),
            category: ProductCategory::Papas,
            extras: Vec::new(),
            exclusions: Vec::new(),
            is_combo: false,
            is_best_seller: false,
            is_available: true,
            preparation_time: Some(8),
        }
    }

    #[test]
    fn test_cart_is_locked_during_checkout() {
        let state = SessionState::default();

        state.with_session_mut(|s| {
            s.editable_cart()
                .unwrap()
                .add_line(&product(), &[], &[], None)
                .unwrap();
            s.checkout = Some(PaymentWorkflow::begin(&s.cart).unwrap());
            assert!(s.editable_cart().is_err());

            s.checkout = None;
            assert!(s.editable_cart().is_ok());
        });
    }

    #[test]
    fn test_cashier_name_falls_back() {
        let state = SessionState::default();
        assert_eq!(state.with_session(|s| s.cashier_name().to_string()), "Cajero");

        state.with_session_mut(|s| {
            s.user = Some(User {
                id: "2".to_string(),
                name: "María Cajera".to_string(),
                email: "cajero@lomiteria.com".to_string(),
                role: UserRole::Cashier,
            })
        });
        assert_eq!(
            state.with_session(|s| s.cashier_name().to_string()),
            "María Cajera"
        );
    }

    #[test]
    fn test_checkout_required() {
        let state = SessionState::default();
        assert!(state.with_session_mut(|s| s.checkout_mut().map(|_| ())).is_err());
    }
}
