//! # Vault Engine
//!
//! A [`Vault`] pools two assets into a weighted set of concentrated
//! liquidity positions and issues fungible shares against them.
//!
//! | Module | Concern |
//! |--------|---------|
//! | [`position_set`] | Slots: range, weight and position handle |
//! | [`valuation`] | Net asset value in asset1 |
//! | [`share_ledger`] | Balances, allowances, supply |
//! | [`access`] | Owner and validator roles |
//! | [`guard`] | Scoped re-entrancy flag |
//! | `allocation`, `deposit`, `withdraw`, `reinvest`, `rebalance` | The allocation engine |
//! | [`events`] | Journal of completed calls |
//!
//! ## Execution model
//!
//! Every mutating entry point takes a [`CallContext`] and runs inside
//! a transaction: it acquires the re-entrancy guard, snapshots the vault
//! and its adapter, and restores both if the call fails. A failed call
//! leaves balances, positions, supply and the event journal exactly as
//! they were.

pub mod access;
mod allocation;
mod deposit;
pub mod events;
pub mod guard;
mod rebalance;
mod reinvest;
pub mod position_set;
pub mod share_ledger;
pub mod valuation;
mod withdraw;

#[cfg(all(test, feature = "clmm"))]
pub(crate) mod fixtures;
#[cfg(all(test, feature = "clmm"))]
mod proptest_properties;

use tracing::{debug, info, warn};

pub use access::AccessPolicy;
pub use allocation::DUST_LIQUIDITY;
pub use deposit::DepositReceipt;
pub use events::VaultEvent;
pub use guard::{GuardScope, ReentrancyGuard};
pub use position_set::PositionSet;
pub use rebalance::RebalanceOutcome;
pub use reinvest::{ReinvestOutcome, SwapRecord};
pub use share_ledger::ShareLedger;
pub use valuation::{LIQUIDITY_UNIT, NavSnapshot, SlotValuation};
pub use withdraw::Withdrawal;

use crate::config::VaultConfig;
use crate::domain::{
    AccountId, Amount, AmountPair, AssetPair, BasisPoints, CallContext, FeeTier, PositionSlot,
    Side,
};
use crate::error::VaultError;
use crate::traits::{AmmAdapter, PositionRegistry};

/// Everything a transaction snapshots besides the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
struct VaultState {
    asset_pair: AssetPair,
    fee_tier: FeeTier,
    ledger: ShareLedger,
    access: AccessPolicy,
    positions: PositionSet,
    idle: AmountPair,
    deposit_cap: Option<Amount>,
    native_side: Option<Side>,
    max_swap_slippage: BasisPoints,
    events: Vec<VaultEvent>,
}

/// A pooled, weighted concentrated-liquidity vault over adapter `A`.
///
/// # Examples
///
/// ```
/// use cellar_vault::prelude::*;
///
/// let pair = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([2; 32]))?;
/// let pool_config = ClmmPoolConfig::new(
///     pair,
///     FeeTier::TIER_0_30_PERCENT,
///     60,
///     Tick::ZERO,
///     vec![SeedLiquidity::new(-60_000, 60_000, Liquidity::new(1_000_000_000_000_000_000_000))],
/// )?;
/// let pool = ClmmPool::from_config(&pool_config)?;
///
/// let owner = AccountId::from_bytes([9; 32]);
/// let config = VaultConfig::new(
///     "Cellar ETH/USDC",
///     "cETH-USDC",
///     pair,
///     FeeTier::TIER_0_30_PERCENT,
///     owner,
///     vec![SlotConfig::new(-600, 600, 1), SlotConfig::new(-1_200, 1_200, 5)],
/// );
/// let mut vault = Vault::new(config, pool)?;
///
/// let alice = CallContext::new(AccountId::from_bytes([1; 32]), 1_000);
/// let one = Amount::new(1_000_000_000_000_000_000);
/// let receipt = vault.add_liquidity(&alice, AmountPair::new(one, one), AmountPair::ZERO, 2_000)?;
/// assert_eq!(vault.balance_of(&alice.caller), receipt.shares);
/// # Ok::<(), VaultError>(())
/// ```
#[derive(Debug)]
pub struct Vault<A> {
    adapter: A,
    state: VaultState,
    guard: ReentrancyGuard,
}

impl<A> Vault<A>
where
    A: AmmAdapter + PositionRegistry + Clone,
{
    /// Creates an empty vault over `adapter`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] if `config` is invalid,
    /// the adapter trades a different pair or fee tier, or a slot's ticks
    /// are off the adapter's tick grid.
    pub fn new(config: VaultConfig, adapter: A) -> Result<Self, VaultError> {
        config.validate()?;
        if adapter.asset_pair() != config.asset_pair {
            return Err(VaultError::InvalidConfiguration(
                "adapter trades a different asset pair",
            ));
        }
        if adapter.fee_tier() != config.fee_tier {
            return Err(VaultError::InvalidConfiguration(
                "adapter fee tier differs from the configured tier",
            ));
        }

        let positions = PositionSet::from_config(&config.slots)?;
        check_alignment(positions.as_slice(), adapter.tick_spacing())?;
        info!(
            name = %config.name,
            symbol = %config.symbol,
            slots = positions.len(),
            owner = %config.owner,
            "vault created"
        );
        let state = VaultState {
            asset_pair: config.asset_pair,
            fee_tier: config.fee_tier,
            ledger: ShareLedger::new(config.name, config.symbol, config.decimals),
            access: AccessPolicy::new(config.owner, config.validators),
            positions,
            idle: AmountPair::ZERO,
            deposit_cap: config.deposit_cap,
            native_side: config.native_side,
            max_swap_slippage: config.max_swap_slippage,
            events: Vec::new(),
        };
        Ok(Self {
            adapter,
            state,
            guard: ReentrancyGuard::new(),
        })
    }

    /// Runs `body` as one all-or-nothing call.
    fn transact<T>(
        &mut self,
        operation: &'static str,
        ctx: &CallContext,
        body: impl FnOnce(&mut A, &mut VaultState) -> Result<T, VaultError>,
    ) -> Result<T, VaultError> {
        let _scope = match self.guard.enter() {
            Ok(scope) => scope,
            Err(error) => {
                warn!(operation, caller = %ctx.caller, %error, "call rejected");
                return Err(error);
            }
        };
        let snapshot = (self.state.clone(), self.adapter.clone());
        match body(&mut self.adapter, &mut self.state) {
            Ok(value) => Ok(value),
            Err(error) => {
                (self.state, self.adapter) = snapshot;
                warn!(operation, caller = %ctx.caller, %error, "call rejected; state restored");
                Err(error)
            }
        }
    }

    // -- access policy ------------------------------------------------------

    /// Adds or removes a validator. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Unauthorized`] unless the caller is the owner.
    pub fn set_validator(
        &mut self,
        ctx: &CallContext,
        account: AccountId,
        enabled: bool,
    ) -> Result<(), VaultError> {
        self.transact("set_validator", ctx, |_, state| {
            if state.access.set_validator(&ctx.caller, account, enabled)? {
                state
                    .events
                    .push(VaultEvent::ValidatorUpdated { account, enabled });
                info!(account = %account, enabled, "validator updated");
            }
            Ok(())
        })
    }

    // -- share token --------------------------------------------------------

    /// Moves shares from the caller to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InsufficientShares`] if the caller holds fewer.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        self.transact("transfer", ctx, |_, state| {
            state.ledger.transfer(ctx.caller, to, amount)?;
            state.events.push(VaultEvent::Transfer {
                from: ctx.caller,
                to,
                amount,
            });
            Ok(())
        })
    }

    /// Sets `spender`'s allowance over the caller's shares.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Reentrant`] if called mid-transaction.
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        self.transact("approve", ctx, |_, state| {
            state.ledger.approve(ctx.caller, spender, amount);
            state.events.push(VaultEvent::Approval {
                owner: ctx.caller,
                spender,
                amount,
            });
            Ok(())
        })
    }

    /// Moves `from`'s shares to `to` using the caller's allowance.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InsufficientAllowance`] if the allowance is short.
    /// - [`VaultError::InsufficientShares`] if `from` holds fewer.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    ) -> Result<(), VaultError> {
        self.transact("transfer_from", ctx, |_, state| {
            state.ledger.transfer_from(ctx.caller, from, to, amount)?;
            state.events.push(VaultEvent::Transfer { from, to, amount });
            Ok(())
        })
    }

    // -- reads --------------------------------------------------------------

    /// Current net asset value in asset1 units.
    ///
    /// # Errors
    ///
    /// Propagates adapter and registry errors.
    pub fn compute_nav(&self) -> Result<Amount, VaultError> {
        self.nav_snapshot()?.nav()
    }

    /// Current valuation with its per-slot breakdown.
    ///
    /// # Errors
    ///
    /// Propagates adapter and registry errors.
    pub fn nav_snapshot(&self) -> Result<NavSnapshot, VaultError> {
        NavSnapshot::capture(&self.adapter, &self.state.positions, &self.state.idle)
    }
}

impl<A> Vault<A> {
    /// Share name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.state.ledger.name()
    }

    /// Share symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        self.state.ledger.symbol()
    }

    /// Share decimals.
    #[must_use]
    pub const fn decimals(&self) -> u8 {
        self.state.ledger.decimals()
    }

    /// Total shares outstanding.
    #[must_use]
    pub const fn total_supply(&self) -> Amount {
        self.state.ledger.total_supply()
    }

    /// Shares held by `account`.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.ledger.balance_of(account)
    }

    /// Remaining allowance of `spender` over `owner`'s shares.
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state.ledger.allowance(owner, spender)
    }

    /// The immutable owner.
    #[must_use]
    pub const fn owner(&self) -> AccountId {
        self.state.access.owner()
    }

    /// Returns `true` if `account` may call reinvest.
    #[must_use]
    pub fn is_validator(&self, account: &AccountId) -> bool {
        self.state.access.is_validator(account)
    }

    /// Slot at `index`, or `None` past the end.
    #[must_use]
    pub fn position_slot(&self, index: usize) -> Option<PositionSlot> {
        self.state.positions.get(index).copied()
    }

    /// All slots in order.
    #[must_use]
    pub fn position_slots(&self) -> &[PositionSlot] {
        self.state.positions.as_slice()
    }

    /// Balances held outside any position.
    #[must_use]
    pub const fn idle_balances(&self) -> AmountPair {
        self.state.idle
    }

    /// The pair this vault trades.
    #[must_use]
    pub const fn asset_pair(&self) -> AssetPair {
        self.state.asset_pair
    }

    /// The pool fee tier.
    #[must_use]
    pub const fn fee_tier(&self) -> FeeTier {
        self.state.fee_tier
    }

    /// NAV ceiling for deposits, if any.
    #[must_use]
    pub const fn deposit_cap(&self) -> Option<Amount> {
        self.state.deposit_cap
    }

    /// Side settled in native form by the `_native` entry points.
    #[must_use]
    pub const fn native_side(&self) -> Option<Side> {
        self.state.native_side
    }

    /// The underlying adapter.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Mutable access to the adapter, for hosts that also drive the pool
    /// directly (other traders, price moves).
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// A handle on the vault's re-entrancy flag.
    #[must_use]
    pub fn reentrancy_guard(&self) -> ReentrancyGuard {
        self.guard.clone()
    }

    /// Drains the event journal.
    pub fn take_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.state.events)
    }
}

/// # Errors
///
/// Returns [`VaultError::Expired`] if `deadline` is in the past.
fn check_deadline(ctx: &CallContext, deadline: u64) -> Result<(), VaultError> {
    if ctx.timestamp > deadline {
        return Err(VaultError::Expired);
    }
    Ok(())
}

/// Rejects slots whose bounds are off the pool's tick grid.
fn check_alignment(slots: &[PositionSlot], spacing: u32) -> Result<(), VaultError> {
    match slots.iter().find(|slot| !slot.range().is_aligned(spacing)) {
        Some(slot) => {
            debug!(range = %slot.range(), spacing, "misaligned slot");
            Err(VaultError::InvalidConfiguration(
                "slot ticks must align to the pool tick spacing",
            ))
        }
        None => Ok(()),
    }
}

#[cfg(all(test, feature = "clmm"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::SlotConfig;
    use crate::domain::AssetId;
    use crate::vault::fixtures::{
        E18, alice, bob, both, config, ctx, deep_pool, deposit, owner, validator, vault,
    };

    // -- construction ---------------------------------------------------------

    #[test]
    fn new_vault_is_empty() {
        let v = vault();
        assert_eq!(v.name(), "Cellar Test");
        assert_eq!(v.symbol(), "CLT");
        assert_eq!(v.decimals(), 18);
        assert!(v.total_supply().is_zero());
        assert_eq!(v.compute_nav(), Ok(Amount::ZERO));
        assert_eq!(v.owner(), owner());
        assert!(v.is_validator(&validator()));
        assert_eq!(v.position_slots().len(), 3);
        assert!(v.position_slot(0).is_some_and(|s| !s.is_occupied()));
        assert!(v.position_slot(3).is_none());
    }

    #[test]
    fn rejects_mismatched_adapter() {
        let Ok(other) = AssetPair::new(AssetId::from_bytes([1; 32]), AssetId::from_bytes([3; 32]))
        else {
            panic!("pair");
        };
        let mut cfg = config();
        cfg.asset_pair = other;
        let Err(VaultError::InvalidConfiguration(_)) = Vault::new(cfg, deep_pool()) else {
            panic!("pair mismatch must fail");
        };
        let mut cfg = config();
        cfg.fee_tier = FeeTier::TIER_0_05_PERCENT;
        let Err(VaultError::InvalidConfiguration(_)) = Vault::new(cfg, deep_pool()) else {
            panic!("fee mismatch must fail");
        };
    }

    #[test]
    fn rejects_invalid_slots() {
        let mut cfg = config();
        cfg.slots = vec![SlotConfig::new(600, -600, 1)];
        assert!(Vault::new(cfg, deep_pool()).is_err());
    }

    #[test]
    fn rejects_slots_off_the_tick_grid() {
        let mut cfg = config();
        cfg.slots = vec![SlotConfig::new(-600, 600, 1), SlotConfig::new(-50, 50, 1)];
        assert_eq!(
            Vault::new(cfg, deep_pool()).map(|_| ()),
            Err(VaultError::InvalidConfiguration(
                "slot ticks must align to the pool tick spacing"
            ))
        );
    }

    // -- share token ----------------------------------------------------------

    #[test]
    fn transfer_and_allowance_flow() {
        let mut v = vault();
        let receipt = deposit(&mut v, alice(), 10 * E18);
        let _ = v.take_events();

        let third = Amount::new(receipt.shares.get() / 3);
        assert_eq!(v.transfer(&ctx(alice()), bob(), third), Ok(()));
        assert_eq!(v.balance_of(&bob()), third);

        assert_eq!(v.approve(&ctx(alice()), bob(), third), Ok(()));
        assert_eq!(v.transfer_from(&ctx(bob()), alice(), bob(), third), Ok(()));
        assert!(v.allowance(&alice(), &bob()).is_zero());
        assert_eq!(
            v.transfer_from(&ctx(bob()), alice(), bob(), Amount::new(1)),
            Err(VaultError::InsufficientAllowance)
        );
        assert_eq!(
            v.balance_of(&alice()).get() + v.balance_of(&bob()).get(),
            v.total_supply().get()
        );
        let events = v.take_events();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[1], VaultEvent::Approval { .. }));
    }

    #[test]
    fn failed_transfer_leaves_no_event() {
        let mut v = vault();
        assert_eq!(
            v.transfer(&ctx(alice()), bob(), Amount::new(1)),
            Err(VaultError::InsufficientShares)
        );
        assert!(v.take_events().is_empty());
    }

    // -- access ---------------------------------------------------------------

    #[test]
    fn set_validator_is_owner_only() {
        let mut v = vault();
        assert_eq!(
            v.set_validator(&ctx(alice()), alice(), true),
            Err(VaultError::Unauthorized)
        );
        assert_eq!(v.set_validator(&ctx(owner()), alice(), true), Ok(()));
        assert!(v.is_validator(&alice()));
        assert_eq!(
            v.take_events(),
            vec![VaultEvent::ValidatorUpdated {
                account: alice(),
                enabled: true
            }]
        );
    }

    // -- guard ----------------------------------------------------------------

    #[test]
    fn held_guard_rejects_every_entry_point() {
        let mut v = vault();
        let guard = v.reentrancy_guard();
        let Ok(scope) = guard.enter() else {
            panic!("enter");
        };
        assert_eq!(
            v.add_liquidity(&ctx(alice()), both(E18), AmountPair::ZERO, u64::MAX)
                .map(|_| ()),
            Err(VaultError::Reentrant)
        );
        assert_eq!(
            v.approve(&ctx(alice()), bob(), Amount::new(1)),
            Err(VaultError::Reentrant)
        );
        assert_eq!(v.reinvest(&ctx(validator())).map(|_| ()), Err(VaultError::Reentrant));
        drop(scope);
        assert!(v.approve(&ctx(alice()), bob(), Amount::new(1)).is_ok());
    }

    #[test]
    fn deadline_check() {
        assert_eq!(check_deadline(&ctx(alice()), 100), Ok(()));
        assert_eq!(check_deadline(&ctx(alice()), 99), Err(VaultError::Expired));
    }
}
