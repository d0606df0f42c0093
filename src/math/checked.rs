//! Checked arithmetic trait for domain wrapper types.
//!
//! [`CheckedArithmetic`] lifts the `Option`-returning methods of
//! [`Amount`] and [`Liquidity`] into `Result<Self, VaultError>` so vault code
//! can chain them with `?`.
//!
//! # Examples
//!
//! ```
//! use cellar_vault::domain::{Amount, Rounding};
//! use cellar_vault::math::CheckedArithmetic;
//!
//! let nav = Amount::new(1_000);
//! let slice = nav.safe_mul_div(&Amount::new(1), &Amount::new(4), Rounding::Down);
//! assert_eq!(slice, Ok(Amount::new(250)));
//! ```

use crate::domain::{Amount, Liquidity, Rounding};
use crate::error::VaultError;

/// Fallible arithmetic for domain wrapper types.
///
/// # Contract
///
/// - **No panics**: every error condition produces `Err`.
/// - **No saturation**: saturation hides accounting bugs; errors propagate.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if the sum is not representable.
    fn safe_add(&self, other: &Self) -> Result<Self, VaultError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, VaultError>;

    /// Computes `self * numerator / denominator` with explicit rounding.
    ///
    /// # Errors
    ///
    /// - [`VaultError::DivisionByZero`] if `denominator` is zero.
    /// - [`VaultError::Overflow`] if the quotient is not representable.
    fn safe_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, VaultError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, VaultError> {
        self.checked_add(other)
            .ok_or(VaultError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, VaultError> {
        self.checked_sub(other)
            .ok_or(VaultError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, VaultError> {
        if denominator.is_zero() {
            return Err(VaultError::DivisionByZero);
        }
        self.checked_mul_div(numerator, denominator, rounding)
            .ok_or(VaultError::Overflow("amount mul-div overflow"))
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Liquidity {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, VaultError> {
        self.checked_add(other)
            .ok_or(VaultError::Overflow("liquidity addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, VaultError> {
        self.checked_sub(other)
            .ok_or(VaultError::Underflow("liquidity subtraction underflow"))
    }

    fn safe_mul_div(
        &self,
        numerator: &Self,
        denominator: &Self,
        rounding: Rounding,
    ) -> Result<Self, VaultError> {
        if denominator.is_zero() {
            return Err(VaultError::DivisionByZero);
        }
        self.pro_rata(numerator.get(), denominator.get(), rounding)
            .ok_or(VaultError::Overflow("liquidity mul-div overflow"))
    }
}
