//! Rounding-aware integer division.
//!
//! [`div_round`] divides two `u128` values; [`mul_div`] computes
//! `a * b / d` through a 256-bit intermediate so the product never
//! overflows; [`mul_div_wide`] does the same for `U256` operands through a
//! 512-bit intermediate.
//!
//! # Convention
//!
//! **Always round against the caller** (vault-favorable):
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Shares minted | [`Rounding::Down`] |
//! | Liquidity removed for a withdrawal | [`Rounding::Down`] |
//! | Assets paid out | [`Rounding::Down`] |
//! | Assets required for a liquidity amount | [`Rounding::Up`] |
//!
//! # Examples
//!
//! ```
//! use cellar_vault::domain::Rounding;
//! use cellar_vault::math::{div_round, mul_div};
//!
//! assert_eq!(div_round(10, 3, Rounding::Up), Some(4));
//! assert_eq!(mul_div(u128::MAX, 2, 4, Rounding::Down), Some(u128::MAX / 2));
//! ```

use primitive_types::{U256, U512};

use crate::domain::Rounding;

/// Integer division of `u128` values with explicit rounding direction.
///
/// Returns [`None`] if `denominator` is zero.
#[must_use]
pub const fn div_round(numerator: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = numerator / denominator;
    match rounding {
        Rounding::Down => Some(q),
        // q + 1 cannot overflow: a nonzero remainder implies q < u128::MAX
        Rounding::Up if numerator % denominator != 0 => Some(q + 1),
        Rounding::Up => Some(q),
    }
}

/// Computes `a * b / denominator` without intermediate overflow.
///
/// Returns [`None`] if `denominator` is zero or the quotient exceeds
/// `u128::MAX`.
#[must_use]
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    let q = mul_div_wide(U256::from(a), U256::from(b), U256::from(denominator), rounding)?;
    u256_to_u128(q)
}

/// Computes `a * b / denominator` on `U256` operands with a 512-bit
/// intermediate.
///
/// Returns [`None`] if `denominator` is zero or the quotient exceeds
/// `U256::MAX`.
#[must_use]
pub fn mul_div_wide(a: U256, b: U256, denominator: U256, rounding: Rounding) -> Option<U256> {
    if denominator.is_zero() {
        return None;
    }
    let product: U512 = a.full_mul(b);
    let d = U512::from(denominator);
    let mut q = product / d;
    if rounding.is_up() && !(product % d).is_zero() {
        q = q.checked_add(U512::one())?;
    }
    u512_to_u256(q)
}

/// Narrows a `U256` to `u128`, or `None` if it does not fit.
#[must_use]
pub fn u256_to_u128(value: U256) -> Option<u128> {
    let words = value.0;
    if words[2] != 0 || words[3] != 0 {
        return None;
    }
    Some((u128::from(words[1]) << 64) | u128::from(words[0]))
}

fn u512_to_u256(value: U512) -> Option<U256> {
    let w = value.0;
    if w[4..].iter().any(|&word| word != 0) {
        return None;
    }
    Some(U256([w[0], w[1], w[2], w[3]]))
}
