//! Declarative blueprints for the vault and the reference pool.
//!
//! [`VaultConfig`] describes a vault (share token, pool identity, roles,
//! weighted slots and policy limits); [`ClmmPoolConfig`] describes the
//! in-memory pool used for simulation and tests. Both deserialize from
//! JSON and validate before use.

mod clmm;
mod vault;

pub use clmm::{ClmmPoolConfig, SeedLiquidity};
pub use vault::{
    DEFAULT_DECIMALS, DEFAULT_MAX_SWAP_SLIPPAGE, SlotConfig, VaultConfig, build_slots,
};
