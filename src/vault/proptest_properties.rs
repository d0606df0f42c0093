//! Property-based tests for the vault engine, run against the reference
//! concentrated-liquidity pool.
//!
//! 1. **Deposit fairness**: of two identical back-to-back deposits, the
//!    later never mints more and trails by at most one share.
//! 2. **Value conservation**: a withdrawal never returns more than its NAV
//!    share, and falls short of it by rounding only.
//! 3. **Rebalance neutrality**: balances and supply are untouched and NAV
//!    survives the migration.
//! 4. **Reinvest non-dilution**: supply is unchanged and NAV never drops.
//! 5. **Weight fidelity**: slot liquidities follow slot weights to 1e-6.
//! 6. **Atomicity**: a rejected deposit leaves vault and pool unchanged.

#![allow(clippy::panic)]

use proptest::prelude::*;

use super::Vault;
use super::fixtures::{E18, acct, alice, bob, both, churn, config, ctx, owner, validator, vault, vault_with};
use super::valuation::pair_value;
use crate::config::SlotConfig;
use crate::domain::{AccountId, Amount, AmountPair};
use crate::pools::ClmmPool;
use crate::traits::PositionRegistry;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn carol() -> AccountId {
    acct(4)
}

fn try_deposit(v: &mut Vault<ClmmPool>, who: AccountId, amount: u128) -> Option<Amount> {
    v.add_liquidity(&ctx(who), both(amount), AmountPair::ZERO, u64::MAX)
        .ok()
        .map(|r| r.shares)
}

fn nav(v: &Vault<ClmmPool>) -> u128 {
    let Ok(nav) = v.compute_nav() else {
        panic!("nav must be computable");
    };
    nav.get()
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Deposit sizes between 0.001 and 1000 whole units.
fn amount_strategy() -> impl Strategy<Value = u128> {
    (1u128..=1_000_000u128).prop_map(|v| v * 1_000_000_000_000_000)
}

/// Aligned slot: lower in [-3000, 3000], width in [60, 3000], weight 1..=10.
fn slot_strategy() -> impl Strategy<Value = SlotConfig> {
    (-50i32..=50i32, 1i32..=50i32, 1u32..=10u32)
        .prop_map(|(lo, width, weight)| SlotConfig::new(lo * 60, (lo + width) * 60, weight))
}

// ---------------------------------------------------------------------------
// Property 1: Deposit fairness
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_identical_deposits_are_fair(seed in amount_strategy(), amount in amount_strategy()) {
        let mut v = vault();
        let Some(_) = try_deposit(&mut v, alice(), seed) else {
            return Ok(());
        };
        let Some(first) = try_deposit(&mut v, bob(), amount) else {
            return Ok(());
        };
        let Some(second) = try_deposit(&mut v, carol(), amount) else {
            return Ok(());
        };
        prop_assert!(second <= first, "later deposit minted more: {} > {}", second, first);
        prop_assert!(first.get() - second.get() <= 1, "shares diverged: {} vs {}", first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 2: Value conservation
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_withdrawal_returns_nav_share(
        a in amount_strategy(),
        b in amount_strategy(),
        pct in 1u128..=100u128,
    ) {
        let mut v = vault();
        let Some(shares) = try_deposit(&mut v, alice(), a) else {
            return Ok(());
        };
        let Some(_) = try_deposit(&mut v, bob(), b) else {
            return Ok(());
        };
        let burn = Amount::new((shares.get() * pct / 100).max(1));
        let supply = v.total_supply().get();
        let expected = primitive_types::U256::from(nav(&v)) * primitive_types::U256::from(burn.get())
            / primitive_types::U256::from(supply);
        let expected = expected.low_u128();

        let Ok(w) = v.remove_liquidity(&ctx(alice()), burn, AmountPair::ZERO, u64::MAX) else {
            return Ok(());
        };
        let Ok(returned) = pair_value(v.adapter(), &w.amounts) else {
            panic!("value");
        };
        prop_assert!(
            returned.get() <= expected,
            "withdrawer favoured: {} > {}", returned, expected
        );
        let tolerance = 1_000_000 + expected / 1_000_000_000_000;
        prop_assert!(
            returned.get() + tolerance >= expected,
            "withdrawer short-changed: {} < {}", returned, expected
        );
    }
}

// ---------------------------------------------------------------------------
// Property 3: Rebalance neutrality
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rebalance_preserves_ownership(
        a in amount_strategy(),
        b in amount_strategy(),
        s0 in slot_strategy(),
        s1 in slot_strategy(),
        s2 in slot_strategy(),
    ) {
        let mut v = vault();
        let Some(_) = try_deposit(&mut v, alice(), a) else {
            return Ok(());
        };
        let Some(_) = try_deposit(&mut v, bob(), b) else {
            return Ok(());
        };
        let before = (v.balance_of(&alice()), v.balance_of(&bob()), v.total_supply());
        let nav_before = nav(&v);

        let Ok(_) = v.rebalance(&ctx(owner()), &[s0, s1, s2]) else {
            panic!("rebalance over valid slots must succeed");
        };

        prop_assert_eq!(before, (v.balance_of(&alice()), v.balance_of(&bob()), v.total_supply()));
        let nav_after = nav(&v);
        let tolerance = 1_000_000 + nav_before / 1_000_000_000;
        prop_assert!(
            nav_after.abs_diff(nav_before) <= tolerance,
            "nav moved from {} to {}", nav_before, nav_after
        );
    }
}

// ---------------------------------------------------------------------------
// Property 4: Reinvest non-dilution
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_reinvest_mints_nothing(
        a in amount_strategy(),
        volume in 1u128..=100u128,
        rounds in 1usize..=3usize,
    ) {
        let mut v = vault();
        let Some(shares) = try_deposit(&mut v, alice(), a) else {
            return Ok(());
        };
        churn(&mut v, volume * E18, rounds);
        let supply = v.total_supply();
        let nav_before = nav(&v);

        let Ok(_) = v.reinvest(&ctx(validator())) else {
            panic!("reinvest by a validator must succeed");
        };

        prop_assert_eq!(v.total_supply(), supply);
        prop_assert_eq!(v.balance_of(&alice()), shares);
        let nav_after = nav(&v);
        prop_assert!(
            nav_after >= nav_before,
            "nav dropped from {} to {}", nav_before, nav_after
        );
    }
}

// ---------------------------------------------------------------------------
// Property 5: Weight fidelity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_liquidity_follows_weights(
        w0 in 1u32..=20u32,
        w1 in 1u32..=20u32,
        w2 in 1u32..=20u32,
        amount in 1u128..=1_000u128,
    ) {
        let mut cfg = config();
        cfg.slots = vec![
            SlotConfig::new(-600, 600, w0),
            SlotConfig::new(-1_200, 1_200, w1),
            SlotConfig::new(-3_000, 3_000, w2),
        ];
        let mut v = vault_with(cfg);
        let Some(_) = try_deposit(&mut v, alice(), amount * E18) else {
            panic!("deposit of whole units must succeed");
        };

        let mut liquidity = Vec::new();
        for slot in v.position_slots() {
            let Some(id) = slot.position() else {
                panic!("every slot funded");
            };
            let Ok(l) = v.adapter().position_liquidity(id) else {
                panic!("registered position");
            };
            liquidity.push((l.get() as f64, f64::from(slot.weight())));
        }
        let (l0, base) = liquidity[0];
        for &(l, w) in &liquidity[1..] {
            let ratio = (l / l0) / (w / base);
            prop_assert!((ratio - 1.0).abs() < 1e-6, "ratio off by {}", ratio - 1.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: Atomicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rejected_deposit_changes_nothing(seed in amount_strategy(), amount in amount_strategy()) {
        let mut v = vault();
        let Some(_) = try_deposit(&mut v, alice(), seed) else {
            return Ok(());
        };
        let pool = v.adapter().clone();
        let slots = v.position_slots().to_vec();
        let supply = v.total_supply();

        let min = both(amount + 1);
        prop_assert!(v.add_liquidity(&ctx(bob()), both(amount), min, u64::MAX).is_err());

        prop_assert_eq!(v.adapter(), &pool);
        prop_assert_eq!(v.position_slots(), slots.as_slice());
        prop_assert_eq!(v.total_supply(), supply);
        prop_assert!(v.balance_of(&bob()).is_zero());
    }
}
