//! Configuration for the in-memory concentrated-liquidity pool.

use serde::{Deserialize, Serialize};

use crate::domain::{AssetPair, FeeTier, Liquidity, Tick, TickRange};
use crate::error::VaultError;

/// Liquidity owned by third parties, placed when the pool is built.
///
/// Seeded liquidity gives swaps depth beyond the vault's own positions; it
/// earns fees but has no handle and is never enumerated as owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedLiquidity {
    /// Lower tick (inclusive).
    pub tick_lower: i32,
    /// Upper tick (exclusive).
    pub tick_upper: i32,
    /// Liquidity placed in the range.
    pub liquidity: Liquidity,
}

impl SeedLiquidity {
    /// Creates a seed entry.
    #[must_use]
    pub const fn new(tick_lower: i32, tick_upper: i32, liquidity: Liquidity) -> Self {
        Self {
            tick_lower,
            tick_upper,
            liquidity,
        }
    }
}

/// Configuration for a [`ClmmPool`](crate::pools::ClmmPool).
///
/// # Key Relationships
///
/// - Price at tick `i`: `P(i) = 1.0001^i`, asset1 per asset0.
/// - `sqrt_price` is stored in Q64.96.
///
/// # Validation
///
/// - Fee tier must be below 100% (1 000 000 pips).
/// - `tick_spacing` must be greater than zero.
/// - `initial_tick` must be in bounds.
/// - Each seed range must be ordered, in bounds and aligned to
///   `tick_spacing`, with nonzero liquidity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClmmPoolConfig {
    asset_pair: AssetPair,
    fee_tier: FeeTier,
    tick_spacing: u32,
    initial_tick: Tick,
    #[serde(default)]
    seed_liquidity: Vec<SeedLiquidity>,
}

impl ClmmPoolConfig {
    /// Creates a new `ClmmPoolConfig`.
    ///
    /// # Arguments
    ///
    /// - `tick_spacing`: granularity of position bounds (standard values:
    ///   1, 10, 60, 200). Must be greater than zero.
    /// - `initial_tick`: the tick whose price the pool starts at. It need
    ///   not be aligned.
    /// - `seed_liquidity`: background liquidity (may be empty).
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfiguration`] if the fee tier or
    ///   `tick_spacing` is invalid, or a seed has zero liquidity.
    /// - [`VaultError::InvalidTickRange`] if a seed range is inverted or
    ///   misaligned.
    pub fn new(
        asset_pair: AssetPair,
        fee_tier: FeeTier,
        tick_spacing: u32,
        initial_tick: Tick,
        seed_liquidity: Vec<SeedLiquidity>,
    ) -> Result<Self, VaultError> {
        let config = Self {
            asset_pair,
            fee_tier,
            tick_spacing,
            initial_tick,
            seed_liquidity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`ClmmPoolConfig::new`].
    pub fn validate(&self) -> Result<(), VaultError> {
        if !self.fee_tier.is_valid() {
            return Err(VaultError::InvalidConfiguration(
                "fee tier must be below 1000000 pips (100%)",
            ));
        }
        if self.tick_spacing == 0 {
            return Err(VaultError::InvalidConfiguration(
                "tick spacing must be greater than zero",
            ));
        }
        for seed in &self.seed_liquidity {
            let range = TickRange::from_indices(seed.tick_lower, seed.tick_upper)?;
            if !range.is_aligned(self.tick_spacing) {
                return Err(VaultError::InvalidTickRange(
                    "seed ticks must be aligned to tick spacing",
                ));
            }
            if seed.liquidity.is_zero() {
                return Err(VaultError::InvalidConfiguration(
                    "seed liquidity must be nonzero",
                ));
            }
        }
        Ok(())
    }

    /// Returns the asset pair.
    #[must_use]
    pub const fn asset_pair(&self) -> &AssetPair {
        &self.asset_pair
    }

    /// Returns the fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    /// Returns the tick spacing.
    #[must_use]
    pub const fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Returns the initial tick.
    #[must_use]
    pub const fn initial_tick(&self) -> Tick {
        self.initial_tick
    }

    /// Returns the seeded background liquidity.
    #[must_use]
    pub fn seed_liquidity(&self) -> &[SeedLiquidity] {
        &self.seed_liquidity
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::AssetId;

    // -- helpers --------------------------------------------------------------

    fn pair() -> AssetPair {
        let Ok(p) = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([2; 32]))
        else {
            panic!("expected valid pair");
        };
        p
    }

    fn tick(v: i32) -> Tick {
        let Ok(t) = Tick::new(v) else {
            panic!("valid tick expected");
        };
        t
    }

    // -- valid construction ---------------------------------------------------

    #[test]
    fn valid_config_no_seeds() {
        let Ok(cfg) = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(0), vec![])
        else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.tick_spacing(), 60);
        assert_eq!(cfg.initial_tick(), tick(0));
        assert!(cfg.seed_liquidity().is_empty());
    }

    #[test]
    fn unaligned_initial_tick_is_allowed() {
        let result = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(7), vec![]);
        assert!(result.is_ok());
    }

    #[test]
    fn valid_config_with_seeds() {
        let seeds = vec![SeedLiquidity::new(-6_000, 6_000, Liquidity::new(1_000_000))];
        let Ok(cfg) = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(0), seeds)
        else {
            panic!("expected Ok");
        };
        assert_eq!(cfg.seed_liquidity().len(), 1);
    }

    // -- invalid configurations -----------------------------------------------

    #[test]
    fn zero_tick_spacing_rejected() {
        let result = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 0, tick(0), vec![]);
        let Err(VaultError::InvalidConfiguration(_)) = result else {
            panic!("expected InvalidConfiguration");
        };
    }

    #[test]
    fn full_fee_rejected() {
        let result = ClmmPoolConfig::new(pair(), FeeTier::new(1_000_000), 60, tick(0), vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn misaligned_seed_rejected() {
        let seeds = vec![SeedLiquidity::new(-61, 60, Liquidity::new(1))];
        let result = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(0), seeds);
        let Err(VaultError::InvalidTickRange(_)) = result else {
            panic!("expected InvalidTickRange");
        };
    }

    #[test]
    fn inverted_or_empty_seed_rejected() {
        let inverted = vec![SeedLiquidity::new(60, -60, Liquidity::new(1))];
        assert!(
            ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(0), inverted)
                .is_err()
        );
        let empty = vec![SeedLiquidity::new(-60, 60, Liquidity::ZERO)];
        assert!(
            ClmmPoolConfig::new(pair(), FeeTier::TIER_0_30_PERCENT, 60, tick(0), empty).is_err()
        );
    }

    #[test]
    fn serde_round_trip() {
        let seeds = vec![SeedLiquidity::new(-600, 600, Liquidity::new(5))];
        let Ok(cfg) = ClmmPoolConfig::new(pair(), FeeTier::TIER_0_05_PERCENT, 10, tick(-3), seeds)
        else {
            panic!("expected Ok");
        };
        let Ok(json) = serde_json::to_string(&cfg) else {
            panic!("serializes");
        };
        let Ok(back) = serde_json::from_str::<ClmmPoolConfig>(&json) else {
            panic!("parses");
        };
        assert_eq!(back, cfg);
    }
}
