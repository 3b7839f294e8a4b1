//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE ROUNDING PROBLEM                                                   │
//! │    Rounding the tax of every line, then adding, drifts away from        │
//! │    the tax of the subtotal.                                             │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimals, rounded only for display                 │
//! │    11600 × 0.21 = 2436 exactly, 0.10 × 0.21 = 0.021 exactly             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lomi_core::money::Money;
//!
//! let lomito = Money::from_units(5000);
//! let extra_egg = Money::from_units(800);
//!
//! let line = (lomito + extra_egg) * 2u32;
//! assert_eq!(line, Money::from_units(11600));
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Number of decimal places shown to customers.
pub const DISPLAY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store currency.
///
/// ## Design Decisions
/// - **Decimal, not float**: every sum and product is exact
/// - **Signed**: change and refunds can be expressed, prices are validated
///   to be non-negative where they enter the system
/// - **No internal rounding**: [`Money::rounded`] exists for display only
///
/// ## Where Money Flows
/// ```text
/// Product.price ──┬──► CartLine.unit_price ──► CartLine.line_total
///                 │
///  Extra.price ───┘
///
/// Cart.subtotal ──► tax (21%) ──► + delivery fee ──► Cart.total ──► Order
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ```rust
    /// use lomi_core::money::Money;
    ///
    /// let fee = Money::from_units(500);
    /// assert_eq!(fee.to_string(), "$500.00");
    /// ```
    #[inline]
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates a Money value from minor units (cents).
    ///
    /// ```rust
    /// use lomi_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the exact amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Calculates tax at the given rate without rounding.
    ///
    /// ## Implementation
    /// `amount × bps / 10000`. Division by a power of ten only grows the
    /// decimal scale, so the result is exact.
    ///
    /// ## Example
    /// ```rust
    /// use lomi_core::money::Money;
    /// use lomi_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_units(11600);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(2100));
    /// assert_eq!(tax, Money::from_units(2436));
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(self.0 * Decimal::from(rate.bps()) / Decimal::from(10_000u32))
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use lomi_core::money::Money;
    ///
    /// let unit = Money::from_units(1500);
    /// assert_eq!(unit.multiply_quantity(3), Money::from_units(4500));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Rounds to [`DISPLAY_DECIMALS`] using Bankers Rounding.
    ///
    /// Only for presentation. Never feed a rounded value back into a total.
    ///
    /// ```rust
    /// use lomi_core::money::Money;
    /// use lomi_core::types::TaxRate;
    ///
    /// let tax = Money::from_cents(10).calculate_tax(TaxRate::from_bps(2100));
    /// assert_eq!(tax.to_string(), "$0.02");
    /// assert_eq!(tax.rounded(), Money::from_cents(2));
    /// ```
    pub fn rounded(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointNearestEven),
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount rounded for a receipt line, e.g. `$14036.00`.
///
/// Localized formatting belongs to the presentation layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded().0;
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        write!(
            f,
            "{}${:.prec$}",
            sign,
            rounded.abs(),
            prec = DISPLAY_DECIMALS as usize
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a line quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Parses operator input such as `15000`, `14036.5` or `$15000`.
impl std::str::FromStr for Money {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        input
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map(Money)
            .map_err(|e| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
