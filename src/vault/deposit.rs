//! Deposits: weighted deployment of caller assets and share minting.
//!
//! Value added is measured as the NAV contribution of the liquidity that
//! was actually minted. The first deposit mints one share per asset1 unit
//! of that value; later deposits mint `supply * added / nav_before`. Both
//! round down.

use primitive_types::U256;
use tracing::info;

use super::allocation::deploy;
use super::valuation::{LIQUIDITY_UNIT, NavSnapshot};
use super::{Vault, VaultEvent, VaultState, check_deadline};
use crate::domain::{Amount, AmountPair, CallContext, Rounding, Side};
use crate::error::VaultError;
use crate::math::{mul_div_wide, u256_to_u128};
use crate::traits::{AmmAdapter, PositionRegistry};

/// Outcome of a successful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Shares minted to the caller.
    pub shares: Amount,
    /// Assets deployed into positions.
    pub used: AmountPair,
    /// Assets not deployed, returned to the caller.
    pub refund: AmountPair,
    /// Side settled in native form, for the native variant.
    pub native_side: Option<Side>,
}

impl DepositReceipt {
    /// Refund owed in native form, if the native variant was used.
    #[must_use]
    pub fn native_refund(&self) -> Option<Amount> {
        self.native_side.map(|side| self.refund.get(side))
    }
}

impl<A> Vault<A>
where
    A: AmmAdapter + PositionRegistry + Clone,
{
    /// Deposits up to `desired` across the slots and mints shares.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Reentrant`] if a call is already in progress.
    /// - [`VaultError::Expired`] if `deadline` has passed.
    /// - [`VaultError::SlippageExceeded`] if less than `min` is deployed.
    /// - [`VaultError::DepositCapExceeded`] if NAV would exceed the cap.
    /// - [`VaultError::ZeroShares`] if the deposit is worth no shares.
    pub fn add_liquidity(
        &mut self,
        ctx: &CallContext,
        desired: AmountPair,
        min: AmountPair,
        deadline: u64,
    ) -> Result<DepositReceipt, VaultError> {
        self.transact("add_liquidity", ctx, |adapter, state| {
            execute(adapter, state, ctx, desired, min, deadline, None)
        })
    }

    /// Deposit variant where the `native_side` leg arrives as the native
    /// asset. `native_amount` replaces the desired amount on that side;
    /// the undeployed part of it is refunded in native form.
    ///
    /// # Errors
    ///
    /// As [`add_liquidity`](Self::add_liquidity), plus
    /// [`VaultError::InvalidConfiguration`] if no native side is
    /// configured.
    pub fn add_liquidity_native(
        &mut self,
        ctx: &CallContext,
        native_amount: Amount,
        other_desired: Amount,
        min: AmountPair,
        deadline: u64,
    ) -> Result<DepositReceipt, VaultError> {
        self.transact("add_liquidity_native", ctx, |adapter, state| {
            let side = state
                .native_side
                .ok_or(VaultError::InvalidConfiguration("vault has no native side"))?;
            let desired = AmountPair::ZERO
                .with(side, native_amount)
                .with(side.other(), other_desired);
            execute(adapter, state, ctx, desired, min, deadline, Some(side))
        })
    }
}

fn execute<A: AmmAdapter + PositionRegistry>(
    adapter: &mut A,
    state: &mut VaultState,
    ctx: &CallContext,
    desired: AmountPair,
    min: AmountPair,
    deadline: u64,
    native_side: Option<Side>,
) -> Result<DepositReceipt, VaultError> {
    check_deadline(ctx, deadline)?;

    let before = NavSnapshot::capture(adapter, &state.positions, &state.idle)?;
    let supply = state.ledger.total_supply();
    if !supply.is_zero() && before.scaled().is_zero() {
        return Err(VaultError::DivisionByZero);
    }

    let deployment = deploy(adapter, &mut state.positions, desired)?;
    if !deployment.used.covers(&min) {
        return Err(VaultError::SlippageExceeded);
    }

    let added = before.value_added(&deployment)?;
    let shares = shares_for(supply, added, before.scaled())?;
    if shares.is_zero() {
        return Err(VaultError::ZeroShares);
    }

    if let Some(cap) = state.deposit_cap {
        let after = before
            .scaled()
            .checked_add(added)
            .ok_or(VaultError::Overflow("net asset value"))?
            / U256::from(LIQUIDITY_UNIT);
        if after > U256::from(cap.get()) {
            return Err(VaultError::DepositCapExceeded);
        }
    }

    state.ledger.mint(ctx.caller, shares)?;
    let refund = desired.checked_sub(&deployment.used)?;
    state.events.push(VaultEvent::Deposited {
        account: ctx.caller,
        shares,
        amounts: deployment.used,
    });
    info!(
        caller = %ctx.caller,
        shares = %shares,
        used = %deployment.used,
        refund = %refund,
        slots = deployment.slots.len(),
        "deposit"
    );

    Ok(DepositReceipt {
        shares,
        used: deployment.used,
        refund,
        native_side,
    })
}

/// Shares minted for a deposit adding `added` (scaled) to a vault with
/// `supply` shares and scaled NAV `nav`.
fn shares_for(supply: Amount, added: U256, nav: U256) -> Result<Amount, VaultError> {
    let shares = if supply.is_zero() {
        added / U256::from(LIQUIDITY_UNIT)
    } else {
        mul_div_wide(U256::from(supply.get()), added, nav, Rounding::Down)
            .ok_or(VaultError::DivisionByZero)?
    };
    u256_to_u128(shares)
        .map(Amount::new)
        .ok_or(VaultError::Overflow("minted shares"))
}

#[cfg(all(test, feature = "clmm"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::vault::fixtures::{E18, alice, bob, both, config, ctx, deposit, vault, vault_with};

    // -- share math -----------------------------------------------------------

    #[test]
    fn bootstrap_mints_value_in_units() {
        let added = U256::from(5u8) * U256::from(LIQUIDITY_UNIT) + U256::from(7u8);
        assert_eq!(shares_for(Amount::ZERO, added, U256::zero()), Ok(Amount::new(5)));
    }

    #[test]
    fn later_mints_are_proportional_and_round_down() {
        let nav = U256::from(300u16);
        assert_eq!(
            shares_for(Amount::new(100), U256::from(299u16), nav),
            Ok(Amount::new(99))
        );
        assert_eq!(
            shares_for(Amount::new(100), U256::from(300u16), nav),
            Ok(Amount::new(100))
        );
    }

    // -- add_liquidity --------------------------------------------------------

    #[test]
    fn first_deposit_mints_about_its_value() {
        let mut v = vault();
        let receipt = deposit(&mut v, alice(), 10 * E18);
        // deployed value at unit price is the sum of both legs
        let value = receipt.used.amount0.get() + receipt.used.amount1.get();
        assert!(receipt.shares.get().abs_diff(value) < 1_000_000);
        assert_eq!(v.total_supply(), receipt.shares);
        assert_eq!(
            receipt.used.checked_add(&receipt.refund),
            Ok(both(10 * E18))
        );
        assert!(v.position_slots().iter().all(|s| s.is_occupied()));
        assert!(v.idle_balances().is_zero());
    }

    #[test]
    fn identical_deposits_mint_identical_shares() {
        let mut v = vault();
        let a = deposit(&mut v, alice(), 7 * E18);
        let b = deposit(&mut v, bob(), 7 * E18);
        assert_eq!(a.shares, b.shares);
        assert_eq!(a.used, b.used);
    }

    #[test]
    fn expired_deadline() {
        let mut v = vault();
        assert_eq!(
            v.add_liquidity(&ctx(alice()), both(E18), AmountPair::ZERO, 99),
            Err(VaultError::Expired)
        );
    }

    #[test]
    fn slippage_rolls_back() {
        let mut v = vault();
        let _ = deposit(&mut v, alice(), E18);
        let pool_before = v.adapter().clone();
        let supply = v.total_supply();
        assert_eq!(
            v.add_liquidity(&ctx(bob()), both(E18), both(E18 + 1), u64::MAX),
            Err(VaultError::SlippageExceeded)
        );
        assert_eq!(v.adapter(), &pool_before);
        assert_eq!(v.total_supply(), supply);
        assert!(v.balance_of(&bob()).is_zero());
    }

    #[test]
    fn dust_deposit_mints_nothing() {
        let mut v = vault();
        assert_eq!(
            v.add_liquidity(&ctx(alice()), both(10), AmountPair::ZERO, u64::MAX),
            Err(VaultError::ZeroShares)
        );
        assert!(v.position_slots().iter().all(|s| !s.is_occupied()));
    }

    #[test]
    fn cap_rejects_and_restores() {
        let mut v = vault_with(config().with_deposit_cap(Amount::new(15 * E18)));
        let _ = deposit(&mut v, alice(), 5 * E18);
        let nav = v.compute_nav();
        let slots = v.position_slots().to_vec();
        assert_eq!(
            v.add_liquidity(&ctx(bob()), both(5 * E18), AmountPair::ZERO, u64::MAX),
            Err(VaultError::DepositCapExceeded)
        );
        assert_eq!(v.compute_nav(), nav);
        assert_eq!(v.position_slots(), slots.as_slice());
        // a smaller deposit still fits
        assert!(
            v.add_liquidity(&ctx(bob()), both(2 * E18), AmountPair::ZERO, u64::MAX)
                .is_ok()
        );
    }

    // -- native variant -------------------------------------------------------

    #[test]
    fn native_deposit_reports_native_refund() {
        let mut v = vault();
        let Ok(receipt) = v.add_liquidity_native(
            &ctx(alice()),
            Amount::new(3 * E18),
            Amount::new(E18),
            AmountPair::ZERO,
            u64::MAX,
        ) else {
            panic!("native deposit");
        };
        assert_eq!(receipt.native_side, Some(Side::Zero));
        // asset1 binds, so most of the native leg comes back
        let Some(refund) = receipt.native_refund() else {
            panic!("native refund reported");
        };
        assert!(refund.get() > E18);
        assert_eq!(refund, receipt.refund.amount0);
    }

    #[test]
    fn native_requires_configured_side() {
        let mut cfg = config();
        cfg.native_side = None;
        let mut v = vault_with(cfg);
        let Err(VaultError::InvalidConfiguration(_)) = v.add_liquidity_native(
            &ctx(alice()),
            Amount::new(E18),
            Amount::new(E18),
            AmountPair::ZERO,
            u64::MAX,
        ) else {
            panic!("native deposit without a native side must fail");
        };
    }
}
