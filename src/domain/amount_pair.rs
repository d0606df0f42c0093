//! Two-sided asset amounts.

use core::fmt;

use super::{Amount, Rounding, Side};
use crate::error::VaultError;

/// A quantity of each asset of the pair.
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{Amount, AmountPair};
///
/// let deposit = AmountPair::new(Amount::new(10), Amount::new(20));
/// let fees = AmountPair::new(Amount::new(1), Amount::new(2));
/// let total = deposit.checked_add(&fees).expect("no overflow");
/// assert_eq!(total, AmountPair::new(Amount::new(11), Amount::new(22)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AmountPair {
    /// Amount of asset0.
    pub amount0: Amount,
    /// Amount of asset1.
    pub amount1: Amount,
}

impl AmountPair {
    /// Both sides zero.
    pub const ZERO: Self = Self {
        amount0: Amount::ZERO,
        amount1: Amount::ZERO,
    };

    /// Creates a pair.
    #[must_use]
    pub const fn new(amount0: Amount, amount1: Amount) -> Self {
        Self { amount0, amount1 }
    }

    /// Returns `true` if both sides are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount0.is_zero() && self.amount1.is_zero()
    }

    /// Returns the amount on `side`.
    pub const fn get(&self, side: Side) -> Amount {
        match side {
            Side::Zero => self.amount0,
            Side::One => self.amount1,
        }
    }

    /// Replaces the amount on `side`.
    #[must_use]
    pub const fn with(self, side: Side, amount: Amount) -> Self {
        match side {
            Side::Zero => Self::new(amount, self.amount1),
            Side::One => Self::new(self.amount0, amount),
        }
    }

    /// Side-wise checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if either side overflows.
    pub fn checked_add(&self, other: &Self) -> crate::error::Result<Self> {
        Ok(Self {
            amount0: self
                .amount0
                .checked_add(&other.amount0)
                .ok_or(VaultError::Overflow("amount0 sum"))?,
            amount1: self
                .amount1
                .checked_add(&other.amount1)
                .ok_or(VaultError::Overflow("amount1 sum"))?,
        })
    }

    /// Side-wise checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Underflow`] if either side would go negative.
    pub fn checked_sub(&self, other: &Self) -> crate::error::Result<Self> {
        Ok(Self {
            amount0: self
                .amount0
                .checked_sub(&other.amount0)
                .ok_or(VaultError::Underflow("amount0 difference"))?,
            amount1: self
                .amount1
                .checked_sub(&other.amount1)
                .ok_or(VaultError::Underflow("amount1 difference"))?,
        })
    }

    /// Scales both sides by `part / whole`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::DivisionByZero`] if `whole` is zero, or
    /// [`VaultError::Overflow`] if a side does not fit.
    pub fn pro_rata(&self, part: Amount, whole: Amount, rounding: Rounding) -> crate::error::Result<Self> {
        if whole.is_zero() {
            return Err(VaultError::DivisionByZero);
        }
        Ok(Self {
            amount0: self
                .amount0
                .checked_mul_div(&part, &whole, rounding)
                .ok_or(VaultError::Overflow("amount0 pro-rata"))?,
            amount1: self
                .amount1
                .checked_mul_div(&part, &whole, rounding)
                .ok_or(VaultError::Overflow("amount1 pro-rata"))?,
        })
    }

    /// Returns `true` if both sides are at least the matching side of `min`.
    #[must_use]
    pub fn covers(&self, min: &Self) -> bool {
        self.amount0 >= min.amount0 && self.amount1 >= min.amount1
    }
}

impl fmt::Display for AmountPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.amount0, self.amount1)
    }
}
