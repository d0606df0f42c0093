//! Integer arithmetic for vault accounting and concentrated-liquidity math.
//!
//! Everything here is integer-only: prices are Q64.96 `U256` values, amounts
//! and liquidity are `u128`, and every division names its [`Rounding`]
//! direction.
//!
//! | Module | Contents |
//! |--------|----------|
//! | rounding | [`div_round`], [`mul_div`], [`mul_div_wide`] |
//! | checked | [`CheckedArithmetic`] for domain wrappers |
//! | tick_math | [`sqrt_price_at_tick`], [`tick_at_sqrt_price`] |
//! | liquidity_math | amount ↔ liquidity conversions, price stepping |
//!
//! [`Rounding`]: crate::domain::Rounding

mod checked;
mod liquidity_math;
mod rounding;
mod tick_math;

pub use checked::CheckedArithmetic;
pub use liquidity_math::{
    amount0_delta, amount1_delta, amounts_for_liquidity, liquidity_for_amount0,
    liquidity_for_amount1, liquidity_for_amounts, next_sqrt_price_from_input,
    value_at_sqrt_price,
};
pub use rounding::{div_round, mul_div, mul_div_wide, u256_to_u128};
pub use tick_math::{Q96, sqrt_price_at_tick, tick_at_sqrt_price};
