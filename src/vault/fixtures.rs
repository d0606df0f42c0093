//! Shared test scaffolding: a deep reference pool and a three-slot vault.

#![allow(clippy::panic)]

use super::{DepositReceipt, Vault};
use crate::config::{ClmmPoolConfig, SeedLiquidity, SlotConfig, VaultConfig};
use crate::domain::{
    AccountId, Amount, AmountPair, AssetId, AssetPair, CallContext, FeeTier, Liquidity, Side,
    Tick,
};
use crate::pools::ClmmPool;
use crate::traits::FromConfig;

pub(crate) const E18: u128 = 1_000_000_000_000_000_000;

pub(crate) fn acct(b: u8) -> AccountId {
    AccountId::from_bytes([b; 32])
}

pub(crate) fn owner() -> AccountId {
    acct(0xA0)
}

pub(crate) fn validator() -> AccountId {
    acct(0xB0)
}

pub(crate) fn alice() -> AccountId {
    acct(1)
}

pub(crate) fn bob() -> AccountId {
    acct(2)
}

pub(crate) fn ctx(caller: AccountId) -> CallContext {
    CallContext::new(caller, 100)
}

pub(crate) fn both(amount: u128) -> AmountPair {
    AmountPair::new(Amount::new(amount), Amount::new(amount))
}

pub(crate) fn pair() -> AssetPair {
    let Ok(p) = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([2; 32])) else {
        panic!("valid pair");
    };
    p
}

/// Spacing 60, 0.30% fee, price 1, 1000e18 background liquidity over
/// `[-60000, 60000)`.
pub(crate) fn deep_pool() -> ClmmPool {
    let Ok(cfg) = ClmmPoolConfig::new(
        pair(),
        FeeTier::TIER_0_30_PERCENT,
        60,
        Tick::ZERO,
        vec![SeedLiquidity::new(-60_000, 60_000, Liquidity::new(1_000 * E18))],
    ) else {
        panic!("valid pool config");
    };
    let Ok(pool) = ClmmPool::from_config(&cfg) else {
        panic!("valid pool");
    };
    pool
}

pub(crate) fn three_slots() -> Vec<SlotConfig> {
    vec![
        SlotConfig::new(-600, 600, 1),
        SlotConfig::new(-1_200, 1_200, 5),
        SlotConfig::new(-3_000, 3_000, 2),
    ]
}

pub(crate) fn config() -> VaultConfig {
    VaultConfig::new(
        "Cellar Test",
        "CLT",
        pair(),
        FeeTier::TIER_0_30_PERCENT,
        owner(),
        three_slots(),
    )
    .with_validator(validator())
    .with_native_side(Side::Zero)
}

pub(crate) fn vault_with(config: VaultConfig) -> Vault<ClmmPool> {
    let Ok(v) = Vault::new(config, deep_pool()) else {
        panic!("valid vault");
    };
    v
}

pub(crate) fn vault() -> Vault<ClmmPool> {
    vault_with(config())
}

pub(crate) fn deposit(vault: &mut Vault<ClmmPool>, who: AccountId, amount: u128) -> DepositReceipt {
    let Ok(receipt) = vault.add_liquidity(&ctx(who), both(amount), AmountPair::ZERO, u64::MAX)
    else {
        panic!("deposit of {amount} should succeed");
    };
    receipt
}

/// Round-trips `rounds` swaps of `amount` through the pool so the vault's
/// in-range positions accrue fees in both assets.
pub(crate) fn churn(vault: &mut Vault<ClmmPool>, amount: u128, rounds: usize) {
    let pool = vault.adapter_mut();
    for _ in 0..rounds {
        let Ok(out) = pool.swap(Side::Zero, Amount::new(amount)) else {
            panic!("swap 0->1");
        };
        let Ok(_) = pool.swap(Side::One, out.amount_out) else {
            panic!("swap 1->0");
        };
    }
}
