//! Raw asset quantity with checked arithmetic.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Rounding;
use crate::math::{div_round, mul_div};

/// A raw quantity of an asset or of vault shares, in the smallest unit.
///
/// `Amount` carries no decimals. Share balances, token balances and NAV
/// figures all use it. Arithmetic is checked and returns `None` instead of
/// wrapping or panicking.
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{Amount, Rounding};
///
/// let nav = Amount::new(3_000);
/// let share = nav.checked_mul_div(&Amount::new(1), &Amount::new(7), Rounding::Down);
/// assert_eq!(share, Some(Amount::new(428)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Maximum representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Amount` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtraction clamped at zero.
    pub const fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Checked division with an explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        match div_round(self.0, divisor.0, rounding) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Computes `self * numerator / denominator` with a 256-bit intermediate.
    ///
    /// This is the pro-rata primitive: `nav.checked_mul_div(shares, supply)`
    /// is the slice of `nav` owned by `shares`. Returns `None` when the
    /// denominator is zero or the quotient does not fit in `u128`.
    #[must_use]
    pub fn checked_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Option<Self> {
        mul_div(self.0, numerator.0, denominator.0, rounding).map(Self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}
