//! Integer tick ↔ sqrt-price conversion in Q64.96 fixed point.
//!
//! `sqrt_price = sqrt(1.0001^tick) * 2^96`, computed from a table of
//! pre-scaled powers so every result is bit-exact and platform independent.
//!
//! # Examples
//!
//! ```
//! use cellar_vault::domain::Tick;
//! use cellar_vault::math::{Q96, sqrt_price_at_tick, tick_at_sqrt_price};
//!
//! let one = sqrt_price_at_tick(Tick::ZERO);
//! assert_eq!(one, Q96);
//! assert_eq!(tick_at_sqrt_price(one), Ok(Tick::ZERO));
//! ```

use primitive_types::U256;

use crate::domain::Tick;
use crate::error::VaultError;

/// `2^96`, the Q64.96 unit.
pub const Q96: U256 = U256([0, 1 << 32, 0, 0]);

/// `sqrt(1.0001^|bit|) * 2^128` for each bit of the absolute tick, starting at
/// bit 1. Bit 0 is handled separately because its value seeds the product.
const RATIOS: [u128; 19] = [
    0xfff9_7272_373d_4132_59a4_6990_580e_213a,
    0xfff2_e50f_5f65_6932_ef12_357c_f3c7_fdcc,
    0xffe5_caca_7e10_e4e6_1c36_24ea_a094_1cd0,
    0xffcb_9843_d60f_6159_c9db_5883_5c92_6644,
    0xff97_3b41_fa98_c081_472e_6896_dfb2_54c0,
    0xff2e_a164_66c9_6a38_43ec_78b3_26b5_2861,
    0xfe5d_ee04_6a99_a2a8_11c4_61f1_969c_3053,
    0xfcbe_86c7_900a_88ae_dcff_c83b_479a_a3a4,
    0xf987_a725_3ac4_1317_6f2b_074c_f781_5e54,
    0xf339_2b08_22b7_0005_940c_7a39_8e4b_70f3,
    0xe715_9475_a2c2_9b74_43b2_9c7f_a6e8_89d9,
    0xd097_f3bd_fd20_22b8_845a_d8f7_92aa_5825,
    0xa9f7_4646_2d87_0fdf_8a65_dc1f_90e0_61e5,
    0x70d8_69a1_56d2_a1b8_90bb_3df6_2baf_32f7,
    0x31be_135f_97d0_8fd9_8123_1505_542f_cfa6,
    0x09aa_508b_5b7a_84e1_c677_de54_f3e9_9bc9,
    0x005d_6af8_dedb_8119_6699_c329_225e_e604,
    0x0000_2216_e584_f5fa_1ea9_2604_1bed_fe98,
    0x0000_0000_048a_1703_91f7_dc42_444e_8fa2,
];

/// Bit-0 factor, `sqrt(1.0001^-1) * 2^128`.
const RATIO_BIT0: u128 = 0xfffc_b933_bd6f_ad37_aa2d_162d_1a59_4001;

/// Returns `sqrt(1.0001^tick)` as a Q64.96 value.
///
/// Every valid [`Tick`] maps to a value in
/// `[sqrt_price_at_tick(Tick::MIN), sqrt_price_at_tick(Tick::MAX)]`;
/// the function is strictly increasing in `tick`.
#[must_use]
pub fn sqrt_price_at_tick(tick: Tick) -> U256 {
    let abs_tick = tick.get().unsigned_abs();

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from(RATIO_BIT0)
    } else {
        U256::one() << 128u32
    };
    for (i, factor) in RATIOS.iter().enumerate() {
        if abs_tick & (2 << i) != 0 {
            // ratio <= 2^128 and factor < 2^128, so the product fits
            ratio = (ratio * U256::from(*factor)) >> 128u32;
        }
    }

    if tick.get() > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 -> Q64.96, rounding up so tick_at_sqrt_price round-trips
    let remainder_bits = ratio.low_u64() & 0xffff_ffff;
    let shifted = ratio >> 32u32;
    if remainder_bits == 0 {
        shifted
    } else {
        shifted + U256::one()
    }
}

/// Returns the greatest tick whose sqrt price is `<= sqrt_price`.
///
/// # Errors
///
/// Returns [`VaultError::InvalidPrice`] if `sqrt_price` is below the sqrt
/// price of [`Tick::MIN`].
pub fn tick_at_sqrt_price(sqrt_price: U256) -> crate::error::Result<Tick> {
    if sqrt_price < sqrt_price_at_tick(Tick::MIN) {
        return Err(VaultError::InvalidPrice);
    }
    let mut lo = Tick::MIN.get();
    let mut hi = Tick::MAX.get();
    while lo < hi {
        // upper midpoint so the loop always makes progress
        let mid = lo + (hi - lo + 1) / 2;
        if sqrt_price_at_tick(Tick::new(mid)?) <= sqrt_price {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Tick::new(lo)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick {v}");
        };
        t
    }

    #[test]
    fn tick_zero_is_unit_price() {
        assert_eq!(sqrt_price_at_tick(Tick::ZERO), Q96);
    }

    #[test]
    fn bounds_match_reference_values() {
        assert_eq!(sqrt_price_at_tick(Tick::MIN), U256::from(4_295_128_739u64));
        assert_eq!(
            sqrt_price_at_tick(Tick::MAX),
            U256([0x5d95_1d52_6398_8d26, 0xefd1_fc6a_5064_8849, 0xfffd_8963, 0])
        );
    }

    #[test]
    fn strictly_increasing_around_zero() {
        let mut prev = sqrt_price_at_tick(tick(-5));
        for t in -4..=5 {
            let next = sqrt_price_at_tick(tick(t));
            assert!(next > prev, "sqrt price must increase at tick {t}");
            prev = next;
        }
    }

    #[test]
    fn symmetric_ticks_are_reciprocal() {
        // sp(t) * sp(-t) ~= 2^192
        let up = sqrt_price_at_tick(tick(6_000));
        let down = sqrt_price_at_tick(tick(-6_000));
        let product = up.full_mul(down);
        let unit = primitive_types::U512::one() << 192u32;
        let diff = if product > unit { product - unit } else { unit - product };
        // relative error below 2^-80
        assert!(diff < (primitive_types::U512::one() << 112u32));
    }

    #[test]
    fn round_trip_on_exact_ticks() {
        for t in [-887_272, -200_000, -60, -1, 0, 1, 60, 123_456, 887_272] {
            assert_eq!(tick_at_sqrt_price(sqrt_price_at_tick(tick(t))), Ok(tick(t)));
        }
    }

    #[test]
    fn between_ticks_floors() {
        let sp = sqrt_price_at_tick(tick(100)) + U256::one();
        assert_eq!(tick_at_sqrt_price(sp), Ok(tick(100)));
        let below = sqrt_price_at_tick(tick(100)) - U256::one();
        assert_eq!(tick_at_sqrt_price(below), Ok(tick(99)));
    }

    #[test]
    fn below_minimum_is_invalid() {
        assert_eq!(tick_at_sqrt_price(U256::from(1u8)), Err(VaultError::InvalidPrice));
    }
}
