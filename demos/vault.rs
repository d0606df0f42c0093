//! Vault lifecycle walkthrough over the in-memory CLMM pool.
//!
//! Two depositors join a three-slot vault, traders churn the pool so the
//! positions earn fees, a validator compounds them, the owner migrates to
//! tighter ranges and both holders exit.
//!
//! # Run
//!
//! ```bash
//! cargo run --example vault
//! ```

use cellar_vault::prelude::*;

const E18: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("=== Cellar Vault lifecycle ===\n");

    // ── 1. Pool: 0.30% fee, spacing 60, price 1, deep background liquidity
    let pair = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([2; 32]))?;
    let fee = FeeTier::TIER_0_30_PERCENT;
    let seed = SeedLiquidity::new(-60_000, 60_000, Liquidity::new(1_000 * E18));
    let pool = ClmmPool::from_config(&ClmmPoolConfig::new(pair, fee, 60, Tick::ZERO, vec![seed])?)?;

    // ── 2. Vault: three weighted ranges around the price ────────────────
    let owner = AccountId::from_bytes([0xA0; 32]);
    let keeper = AccountId::from_bytes([0xB0; 32]);
    let slots = vec![
        SlotConfig::new(-600, 600, 1),
        SlotConfig::new(-1_200, 1_200, 5),
        SlotConfig::new(-3_000, 3_000, 2),
    ];
    let config = VaultConfig::new("Cellar", "CLR", pair, fee, owner, slots).with_validator(keeper);
    let mut vault = Vault::new(config, pool)?;
    println!("Vault {} ({}) over {} slots", vault.name(), vault.symbol(), vault.position_slots().len());

    // ── 3. Deposits ─────────────────────────────────────────────────────
    let alice = CallContext::new(AccountId::from_bytes([1; 32]), 1_000);
    let bob = CallContext::new(AccountId::from_bytes([2; 32]), 1_001);
    let deadline = 10_000;

    let ten = Amount::new(10 * E18);
    let a = vault.add_liquidity(&alice, AmountPair::new(ten, ten), AmountPair::ZERO, deadline)?;
    println!("\n--- Alice deposits ---");
    println!("  Used:     {}", a.used);
    println!("  Refund:   {}", a.refund);
    println!("  Shares:   {}", a.shares);

    let four = Amount::new(4 * E18);
    let b = vault.add_liquidity(&bob, AmountPair::new(four, four), AmountPair::ZERO, deadline)?;
    println!("\n--- Bob deposits ---");
    println!("  Used:     {}", b.used);
    println!("  Shares:   {}", b.shares);
    println!("  NAV:      {}", vault.compute_nav()?);

    // ── 4. Trading activity accrues fees in the vault's ranges ─────────
    println!("\n--- Churn ---");
    for round in 1..=3 {
        let out = vault.adapter_mut().swap(Side::Zero, Amount::new(60 * E18))?;
        let back = vault.adapter_mut().swap(Side::One, out.amount_out)?;
        println!("  Round {round}: fees {} + {}", out.fee, back.fee);
    }
    let snapshot = vault.nav_snapshot()?;
    println!("  Uncollected fees (asset1 value): {}", snapshot.fees_value());
    println!("  NAV:      {}", snapshot.nav()?);

    // ── 5. Validator compounds the fees ─────────────────────────────────
    let keeper_ctx = CallContext::new(keeper, 1_002);
    let reinvested = vault.reinvest(&keeper_ctx)?;
    println!("\n--- Reinvest ---");
    println!("  Collected: {}", reinvested.collected);
    println!("  Deployed:  {}", reinvested.deployed);
    println!("  Swapped:   {}", reinvested.swap.is_some());
    println!("  Idle:      {}", vault.idle_balances());
    println!("  NAV:       {}", vault.compute_nav()?);

    // ── 6. Owner migrates to tighter ranges ─────────────────────────────
    let owner_ctx = CallContext::new(owner, 1_003);
    let moved = vault.rebalance(
        &owner_ctx,
        &[
            SlotConfig::new(-300, 300, 3),
            SlotConfig::new(-900, 900, 2),
            SlotConfig::new(-6_000, 6_000, 1),
        ],
    )?;
    println!("\n--- Rebalance ---");
    println!("  Closed:    {} positions", moved.closed.len());
    println!("  Withdrawn: {}", moved.withdrawn);
    println!("  Deployed:  {}", moved.deployed);
    println!("  Residual:  {}", moved.residual);
    println!("  Supply:    {} (unchanged)", vault.total_supply());

    // ── 7. Everyone exits ───────────────────────────────────────────────
    let wa = vault.remove_liquidity(&alice, a.shares, AmountPair::ZERO, deadline)?;
    let wb = vault.remove_liquidity(&bob, b.shares, AmountPair::ZERO, deadline)?;
    println!("\n--- Withdrawals ---");
    println!("  Alice:     {} for {} shares", wa.amounts, wa.shares);
    println!("  Bob:       {} for {} shares", wb.amounts, wb.shares);
    println!("  Supply:    {}", vault.total_supply());
    println!("  Events:    {}", vault.take_events().len());

    println!("\n=== Done ===");
    Ok(())
}
