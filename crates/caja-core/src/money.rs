//! # Money Module
//!
//! Provides the `Money` type and the one currency formatter used everywhere
//! money is shown, printed or shared.
//!
//! ## Whole Pesos
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CLP HAS NO FRACTIONAL UNIT                                             │
//! │                                                                         │
//! │  Store value:   15000                                                   │
//! │  Display:       $15.000     ('.' groups thousands, no decimals)         │
//! │  Negative:      -$5.000                                                 │
//! │                                                                         │
//! │  The same integer always renders to the same string: the formatter     │
//! │  reads no locale, clock or global state.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caja_core::money::Money;
//!
//! let price = Money::from_pesos(1000);
//! let line = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(line.to_string(), "$3.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in whole pesos.
///
/// ## Design Decisions
/// - **i64 (signed)**: change and adjustments can be negative
/// - **Single field tuple struct**: serializes as a bare JSON number, which
///   is exactly what the store sends for `total` and `price`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole pesos.
    #[inline]
    pub const fn from_pesos(pesos: i64) -> Self {
        Money(pesos)
    }

    /// Returns the amount in whole pesos.
    #[inline]
    pub const fn pesos(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// assert_eq!(Money::from_pesos(1000).checked_mul_quantity(3), Some(Money::from_pesos(3000)));
    /// assert_eq!(Money::from_pesos(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats an amount as a CLP currency string.
///
/// `$` prefix, `.` thousands separator, no decimal places.
///
/// ## Example
/// ```rust
/// use caja_core::money::{format_currency, Money};
///
/// assert_eq!(format_currency(Money::from_pesos(0)), "$0");
/// assert_eq!(format_currency(Money::from_pesos(999)), "$999");
/// assert_eq!(format_currency(Money::from_pesos(1_234_567)), "$1.234.567");
/// assert_eq!(format_currency(Money::from_pesos(-5000)), "-$5.000");
/// ```
pub fn format_currency(amount: Money) -> String {
    let digits = amount.0.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);

    if amount.is_negative() {
        out.push('-');
    }
    out.push('$');

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }

    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the localized currency string.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_currency(*self))
    }
}

impl From<i64> for Money {
    fn from(pesos: i64) -> Self {
        Money(pesos)
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

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pesos() {
        let money = Money::from_pesos(15000);
        assert_eq!(money.pesos(), 15000);
        assert!(!money.is_zero());
        assert!(Money::zero().is_zero());
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_currency(Money::from_pesos(1)), "$1");
        assert_eq!(format_currency(Money::from_pesos(100)), "$100");
        assert_eq!(format_currency(Money::from_pesos(1000)), "$1.000");
        assert_eq!(format_currency(Money::from_pesos(15000)), "$15.000");
        assert_eq!(format_currency(Money::from_pesos(100000)), "$100.000");
        assert_eq!(format_currency(Money::from_pesos(1000000)), "$1.000.000");
    }

    #[test]
    fn test_format_negative_and_extremes() {
        assert_eq!(format_currency(Money::from_pesos(-1)), "-$1");
        assert_eq!(format_currency(Money::from_pesos(-25000)), "-$25.000");
        assert_eq!(
            format_currency(Money::from_pesos(i64::MIN)),
            "-$9.223.372.036.854.775.808"
        );
    }

    #[test]
    fn test_format_is_stable() {
        let amount = Money::from_pesos(48_990);
        let first = format_currency(amount);
        let second = format_currency(amount);
        assert_eq!(first, second);
        assert_eq!(first, amount.to_string());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_pesos(1000);
        let b = Money::from_pesos(500);

        assert_eq!((a + b).pesos(), 1500);
        assert_eq!((a - b).pesos(), 500);
        assert_eq!((a * 3).pesos(), 3000);

        let mut c = a;
        c += b;
        assert_eq!(c.pesos(), 1500);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_pesos(1000), Money::from_pesos(2500)];
        let by_ref: Money = amounts.iter().sum();
        let by_val: Money = amounts.into_iter().sum();
        assert_eq!(by_ref, Money::from_pesos(3500));
        assert_eq!(by_val, by_ref);
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Money::from_pesos(15000)).unwrap();
        assert_eq!(json, "15000");
        let back: Money = serde_json::from_str("20000").unwrap();
        assert_eq!(back, Money::from_pesos(20000));
    }
}
