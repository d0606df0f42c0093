//! Concentrated-liquidity amount ↔ liquidity conversions on Q64.96 prices.
//!
//! Within a price range `[sqrt_a, sqrt_b]` a position of liquidity `L` holds
//!
//! - `amount0 = L * (sqrt_b - sqrt_p) / (sqrt_p * sqrt_b)` when the price is
//!   inside the range (all asset0 below it),
//! - `amount1 = L * (sqrt_p - sqrt_a)` (all asset1 above it).
//!
//! Amounts the caller must supply round up; amounts the caller receives and
//! liquidity derived from amounts round down.

use primitive_types::U256;

use super::rounding::{mul_div_wide, u256_to_u128};
use super::tick_math::Q96;
use crate::domain::{Amount, AmountPair, Liquidity, Rounding};
use crate::error::VaultError;

fn ordered(sqrt_a: U256, sqrt_b: U256) -> crate::error::Result<(U256, U256)> {
    let (lo, hi) = if sqrt_a <= sqrt_b {
        (sqrt_a, sqrt_b)
    } else {
        (sqrt_b, sqrt_a)
    };
    if lo.is_zero() {
        return Err(VaultError::InvalidPrice);
    }
    Ok((lo, hi))
}

fn narrow_amount(value: U256) -> crate::error::Result<Amount> {
    u256_to_u128(value)
        .map(Amount::new)
        .ok_or(VaultError::Overflow("token amount exceeds u128"))
}

fn narrow_liquidity(value: U256) -> crate::error::Result<Liquidity> {
    u256_to_u128(value)
        .map(Liquidity::new)
        .ok_or(VaultError::Overflow("liquidity exceeds u128"))
}

fn wide(a: U256, b: U256, d: U256, rounding: Rounding) -> crate::error::Result<U256> {
    if d.is_zero() {
        return Err(VaultError::DivisionByZero);
    }
    mul_div_wide(a, b, d, rounding).ok_or(VaultError::Overflow("q96 mul-div"))
}

/// Amount of asset0 spanned by `liquidity` between two sqrt prices.
///
/// # Errors
///
/// - [`VaultError::InvalidPrice`] if either price is zero.
/// - [`VaultError::Overflow`] if the amount exceeds `u128`.
pub fn amount0_delta(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: Liquidity,
    rounding: Rounding,
) -> crate::error::Result<Amount> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    let numerator = U256::from(liquidity.get()) << 96u32;
    let per_hi = wide(numerator, hi - lo, hi, rounding)?;
    narrow_amount(wide(per_hi, U256::one(), lo, rounding)?)
}

/// Amount of asset1 spanned by `liquidity` between two sqrt prices.
///
/// # Errors
///
/// Returns [`VaultError::Overflow`] if the amount exceeds `u128`.
pub fn amount1_delta(
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: Liquidity,
    rounding: Rounding,
) -> crate::error::Result<Amount> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    narrow_amount(wide(U256::from(liquidity.get()), hi - lo, Q96, rounding)?)
}

/// Both amounts held by `liquidity` in `[sqrt_a, sqrt_b]` at price `sqrt_p`.
///
/// # Errors
///
/// Propagates [`amount0_delta`] / [`amount1_delta`] errors.
pub fn amounts_for_liquidity(
    sqrt_p: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    liquidity: Liquidity,
    rounding: Rounding,
) -> crate::error::Result<AmountPair> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    if sqrt_p <= lo {
        Ok(AmountPair::new(
            amount0_delta(lo, hi, liquidity, rounding)?,
            Amount::ZERO,
        ))
    } else if sqrt_p < hi {
        Ok(AmountPair::new(
            amount0_delta(sqrt_p, hi, liquidity, rounding)?,
            amount1_delta(lo, sqrt_p, liquidity, rounding)?,
        ))
    } else {
        Ok(AmountPair::new(
            Amount::ZERO,
            amount1_delta(lo, hi, liquidity, rounding)?,
        ))
    }
}

/// Largest liquidity that `amount0` of asset0 can fund between two prices.
///
/// # Errors
///
/// - [`VaultError::InvalidPrice`] if the prices are zero or equal.
/// - [`VaultError::Overflow`] if the liquidity exceeds `u128`.
pub fn liquidity_for_amount0(
    sqrt_a: U256,
    sqrt_b: U256,
    amount0: Amount,
) -> crate::error::Result<Liquidity> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    if lo == hi {
        return Err(VaultError::InvalidPrice);
    }
    let product = wide(lo, hi, Q96, Rounding::Down)?;
    narrow_liquidity(wide(U256::from(amount0.get()), product, hi - lo, Rounding::Down)?)
}

/// Largest liquidity that `amount1` of asset1 can fund between two prices.
///
/// # Errors
///
/// - [`VaultError::InvalidPrice`] if the prices are zero or equal.
/// - [`VaultError::Overflow`] if the liquidity exceeds `u128`.
pub fn liquidity_for_amount1(
    sqrt_a: U256,
    sqrt_b: U256,
    amount1: Amount,
) -> crate::error::Result<Liquidity> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    if lo == hi {
        return Err(VaultError::InvalidPrice);
    }
    narrow_liquidity(wide(U256::from(amount1.get()), Q96, hi - lo, Rounding::Down)?)
}

/// Largest liquidity fundable from `amounts` in `[sqrt_a, sqrt_b]` at price
/// `sqrt_p`. Inside the range the scarcer side binds.
///
/// # Errors
///
/// Propagates [`liquidity_for_amount0`] / [`liquidity_for_amount1`] errors.
pub fn liquidity_for_amounts(
    sqrt_p: U256,
    sqrt_a: U256,
    sqrt_b: U256,
    amounts: AmountPair,
) -> crate::error::Result<Liquidity> {
    let (lo, hi) = ordered(sqrt_a, sqrt_b)?;
    if sqrt_p <= lo {
        liquidity_for_amount0(lo, hi, amounts.amount0)
    } else if sqrt_p < hi {
        let l0 = liquidity_for_amount0(sqrt_p, hi, amounts.amount0)?;
        let l1 = liquidity_for_amount1(lo, sqrt_p, amounts.amount1)?;
        Ok(l0.min(l1))
    } else {
        liquidity_for_amount1(lo, hi, amounts.amount1)
    }
}

/// Sqrt price after adding `amount_in` of the input asset to a range of
/// active `liquidity`.
///
/// Selling asset0 (`zero_for_one`) lowers the price and rounds the new price
/// up; selling asset1 raises it and rounds down. Both directions keep the
/// pool from giving away more than it received.
///
/// # Errors
///
/// - [`VaultError::InsufficientLiquidity`] if `liquidity` is zero.
/// - [`VaultError::Overflow`] on intermediate overflow.
pub fn next_sqrt_price_from_input(
    sqrt_p: U256,
    liquidity: Liquidity,
    amount_in: Amount,
    zero_for_one: bool,
) -> crate::error::Result<U256> {
    if liquidity.is_zero() {
        return Err(VaultError::InsufficientLiquidity);
    }
    if amount_in.is_zero() {
        return Ok(sqrt_p);
    }
    let amount = U256::from(amount_in.get());
    if zero_for_one {
        let numerator = U256::from(liquidity.get()) << 96u32;
        let denominator = amount
            .checked_mul(sqrt_p)
            .and_then(|product| numerator.checked_add(product));
        match denominator {
            Some(d) => wide(numerator, sqrt_p, d, Rounding::Up),
            // fall back to L / (L / sqrt_p + amount)
            None => {
                let per_price = numerator / sqrt_p;
                let d = per_price
                    .checked_add(amount)
                    .ok_or(VaultError::Overflow("next sqrt price denominator"))?;
                wide(numerator, U256::one(), d, Rounding::Up)
            }
        }
    } else {
        let step = wide(amount, Q96, U256::from(liquidity.get()), Rounding::Down)?;
        sqrt_p
            .checked_add(step)
            .ok_or(VaultError::Overflow("next sqrt price"))
    }
}

/// Converts `amount` across the pair at sqrt price `sqrt_p`.
///
/// With `zero_for_one` the amount is asset0 and the result is its value in
/// asset1 (`amount * p`); otherwise the reverse (`amount / p`).
///
/// # Errors
///
/// - [`VaultError::InvalidPrice`] if `sqrt_p` is zero.
/// - [`VaultError::Overflow`] if the result exceeds `u128`.
pub fn value_at_sqrt_price(
    sqrt_p: U256,
    amount: Amount,
    zero_for_one: bool,
    rounding: Rounding,
) -> crate::error::Result<Amount> {
    if sqrt_p.is_zero() {
        return Err(VaultError::InvalidPrice);
    }
    let a = U256::from(amount.get());
    let value = if zero_for_one {
        let half = wide(a, sqrt_p, Q96, rounding)?;
        wide(half, sqrt_p, Q96, rounding)?
    } else {
        let half = wide(a, Q96, sqrt_p, rounding)?;
        wide(half, Q96, sqrt_p, rounding)?
    };
    narrow_amount(value)
}
