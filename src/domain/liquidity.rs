//! Liquidity units held by a concentrated position.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::Rounding;
use crate::math::mul_div;

/// Liquidity `L` of a concentrated position.
///
/// Distinct from [`Amount`](super::Amount): liquidity measures depth inside
/// a price range, not a quantity of either asset.
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{Liquidity, Rounding};
///
/// let held = Liquidity::new(9_000);
/// // a holder of 1/3 of the supply owns 1/3 of every position
/// assert_eq!(held.pro_rata(1, 3, Rounding::Down), Some(Liquidity::new(3_000)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
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

    /// Returns `self * part / whole`, the slice of this liquidity owned by
    /// `part` out of `whole`.
    #[must_use]
    pub fn pro_rata(&self, part: u128, whole: u128, rounding: Rounding) -> Option<Self> {
        mul_div(self.0, part, whole, rounding).map(Self)
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        assert_eq!(Liquidity::new(42).get(), 42);
        assert!(Liquidity::ZERO.is_zero());
        assert_eq!(Liquidity::default(), Liquidity::ZERO);
        assert_eq!(Liquidity::new(1_000).to_string(), "1000");
    }

    // -- Checked arithmetic -------------------------------------------------

    #[test]
    fn add_sub() {
        let a = Liquidity::new(300);
        let b = Liquidity::new(100);
        assert_eq!(a.checked_add(&b), Some(Liquidity::new(400)));
        assert_eq!(a.checked_sub(&b), Some(Liquidity::new(200)));
        assert_eq!(b.checked_sub(&a), None);
        assert_eq!(Liquidity::new(u128::MAX).checked_add(&b), None);
    }

    // -- pro_rata -----------------------------------------------------------

    #[test]
    fn pro_rata_floors_by_default_direction() {
        let l = Liquidity::new(10);
        assert_eq!(l.pro_rata(1, 3, Rounding::Down), Some(Liquidity::new(3)));
        assert_eq!(l.pro_rata(1, 3, Rounding::Up), Some(Liquidity::new(4)));
    }

    #[test]
    fn pro_rata_full_share_is_identity() {
        let l = Liquidity::new(123_456_789);
        assert_eq!(l.pro_rata(77, 77, Rounding::Down), Some(l));
    }

    #[test]
    fn pro_rata_zero_whole_is_none() {
        assert_eq!(Liquidity::new(5).pro_rata(1, 0, Rounding::Down), None);
    }
}
