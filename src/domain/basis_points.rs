//! Basis-point representation for percentages.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::VaultError;
use crate::math::div_round;

/// Value that represents 100%.
const MAX_BPS: u16 = 10_000;

/// A percentage in basis points (1 bp = 0.01%, 10 000 bp = 100%).
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{Amount, BasisPoints, Rounding};
///
/// let tolerance = BasisPoints::new(100);
/// let floor = tolerance.deduct_from(Amount::new(10_000), Rounding::Up).expect("in range");
/// assert_eq!(floor, Amount::new(9_900));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BasisPoints(u16);

impl BasisPoints {
    /// 0%.
    pub const ZERO: Self = Self(0);

    /// 100%.
    pub const MAX_PERCENT: Self = Self(MAX_BPS);

    /// Creates a new value; not range-checked (see [`is_valid_percent`](Self::is_valid_percent)).
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Returns `true` if the value is within `0..=10_000`.
    #[must_use]
    pub const fn is_valid_percent(&self) -> bool {
        self.0 <= MAX_BPS
    }

    /// Computes `amount * (10_000 - self) / 10_000`, the amount left after
    /// deducting this percentage.
    ///
    /// The rounding applies to the deducted part, so [`Rounding::Up`]
    /// yields the more conservative (smaller) remainder.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidQuantity`] if the percentage exceeds 100%.
    /// - [`VaultError::Overflow`] if the intermediate product overflows.
    pub fn deduct_from(&self, amount: Amount, rounding: Rounding) -> crate::error::Result<Amount> {
        if !self.is_valid_percent() {
            return Err(VaultError::InvalidQuantity("basis points exceed 100%"));
        }
        let product = amount
            .get()
            .checked_mul(u128::from(self.0))
            .ok_or(VaultError::Overflow("basis points product"))?;
        let deducted =
            div_round(product, u128::from(MAX_BPS), rounding).ok_or(VaultError::DivisionByZero)?;
        amount
            .checked_sub(&Amount::new(deducted))
            .ok_or(VaultError::Underflow("basis points deduction"))
    }
}

impl fmt::Display for BasisPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bp", self.0)
    }
}
