//! Convenience re-exports for common types and traits.
//!
//! The prelude brings everything needed to configure a pool, build a vault
//! and drive it into scope with a single import:
//!
//! ```rust
//! use cellar_vault::prelude::*;
//! ```

// Re-export domain types
pub use crate::domain::{
    AccountId, Amount, AmountPair, AssetId, AssetPair, BasisPoints, CallContext, FeeTier,
    Liquidity, PositionId, PositionSlot, Rounding, Side, Tick, TickRange,
};

// Re-export core traits
pub use crate::traits::{AmmAdapter, FromConfig, PositionIncrease, PositionRegistry};

// Re-export math utilities
pub use crate::math::CheckedArithmetic;

// Re-export configuration
pub use crate::config::{ClmmPoolConfig, SeedLiquidity, SlotConfig, VaultConfig};

// Re-export error types
pub use crate::error::{Result, VaultError};

// Re-export the vault engine
pub use crate::vault::{
    DepositReceipt, RebalanceOutcome, ReentrancyGuard, ReinvestOutcome, Vault, VaultEvent,
    Withdrawal,
};

// Re-export the reference pool
#[cfg(feature = "clmm")]
pub use crate::pools::{ClmmPool, SwapOutcome};
