//! # Cellar Vault
//!
//! Pooled concentrated-liquidity vault: many depositors share one weighted
//! set of range positions in a single two-asset pool, and hold fungible
//! shares priced off the vault's net asset value.
//!
//! The vault is generic over its pool. Anything implementing
//! [`AmmAdapter`](traits::AmmAdapter) and
//! [`PositionRegistry`](traits::PositionRegistry) can back it; the crate
//! ships an in-memory Uniswap V3 style [`ClmmPool`](pools::ClmmPool) for
//! simulation and tests.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `clmm` | yes | Integer concentrated-liquidity reference pool |
//!
//! # Quick Start
//!
//! ```rust
//! use cellar_vault::prelude::*;
//!
//! let pair = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([2; 32]))?;
//! let fee = FeeTier::TIER_0_30_PERCENT;
//! let seed = SeedLiquidity::new(-60_000, 60_000, Liquidity::new(1_000_000_000_000_000_000_000));
//! let pool = ClmmPool::from_config(&ClmmPoolConfig::new(pair, fee, 60, Tick::ZERO, vec![seed])?)?;
//!
//! let owner = AccountId::from_bytes([9; 32]);
//! let keeper = AccountId::from_bytes([8; 32]);
//! let slots = vec![
//!     SlotConfig::new(-600, 600, 1),
//!     SlotConfig::new(-1_200, 1_200, 5),
//!     SlotConfig::new(-3_000, 3_000, 2),
//! ];
//! let config = VaultConfig::new("Cellar", "CLR", pair, fee, owner, slots).with_validator(keeper);
//! let mut vault = Vault::new(config, pool)?;
//!
//! // deposit, then exit with every share
//! let alice = CallContext::new(AccountId::from_bytes([1; 32]), 1_000);
//! let one = Amount::new(1_000_000_000_000_000_000);
//! let receipt = vault.add_liquidity(&alice, AmountPair::new(one, one), AmountPair::ZERO, 2_000)?;
//! assert!(vault.compute_nav()?.get() > 0);
//!
//! let exit = vault.remove_liquidity(&alice, receipt.shares, AmountPair::ZERO, 2_000)?;
//! assert!(receipt.used.covers(&exit.amounts));
//! assert!(vault.total_supply().is_zero());
//! # Ok::<(), VaultError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Caller     │  CallContext { caller, timestamp }
//! └──────┬───────┘
//!        │ add_liquidity / remove_liquidity / reinvest / rebalance
//!        ▼
//! ┌──────────────┐
//! │    Vault     │  guard + snapshot/restore, share ledger, access policy
//! └──────┬───────┘
//!        │ allocation by weight, NAV valuation
//!        ▼
//! ┌──────────────┐
//! │  AmmAdapter  │  ClmmPool or a host binding
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Tick`](domain::Tick), [`PositionSlot`](domain::PositionSlot), etc. |
//! | [`traits`] | Pool seams: [`AmmAdapter`](traits::AmmAdapter), [`PositionRegistry`](traits::PositionRegistry), [`FromConfig`](traits::FromConfig) |
//! | [`config`] | [`VaultConfig`](config::VaultConfig) and [`ClmmPoolConfig`](config::ClmmPoolConfig) blueprints |
//! | [`vault`]  | The [`Vault`](vault::Vault) engine |
//! | [`pools`]  | Feature-gated reference pool |
//! | [`math`]   | Integer tick and liquidity math with explicit rounding |
//! | [`error`]  | [`VaultError`](error::VaultError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

// Module declarations (always compiled)
pub mod config;
pub mod domain;
pub mod error;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod traits;
pub mod vault;
