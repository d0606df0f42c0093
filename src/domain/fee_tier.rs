//! Pool fee tiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Pips in one whole (1 pip = 0.0001%).
pub(crate) const PIPS_DENOMINATOR: u32 = 1_000_000;

/// Fee tier of the external pool, in pips (hundredths of a basis point).
///
/// The vault treats the tier as an opaque token handed to its adapter; the
/// reference pool interprets it as the swap fee rate.
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::FeeTier;
///
/// assert_eq!(FeeTier::TIER_0_30_PERCENT.pips(), 3_000);
/// assert!(FeeTier::new(3_000).is_standard());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(u32);

impl FeeTier {
    /// 0.01%.
    pub const TIER_0_01_PERCENT: Self = Self(100);

    /// 0.05%.
    pub const TIER_0_05_PERCENT: Self = Self(500);

    /// 0.30%.
    pub const TIER_0_30_PERCENT: Self = Self(3_000);

    /// 1.00%.
    pub const TIER_1_00_PERCENT: Self = Self(10_000);

    /// Creates a tier from raw pips.
    pub const fn new(pips: u32) -> Self {
        Self(pips)
    }

    /// Returns the fee rate in pips.
    #[must_use]
    pub const fn pips(&self) -> u32 {
        self.0
    }

    /// Returns `true` if the rate is strictly below 100%.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 < PIPS_DENOMINATOR
    }

    /// Returns `true` for the four widely deployed tiers.
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        matches!(self.0, 100 | 500 | 3_000 | 10_000)
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({}pip)", self.0)
    }
}
