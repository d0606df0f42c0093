//! Withdrawals: proportional removal from every position, then burn.
//!
//! The payout is capped at the caller's pro-rata NAV, rounded down. When
//! removal rounding would pay more, the surplus stays idle for the
//! remaining holders.

use tracing::{debug, info};

use super::valuation::{NavSnapshot, pair_value};
use super::{Vault, VaultEvent, VaultState, check_deadline};
use crate::domain::{Amount, AmountPair, CallContext, Rounding, Side};
use crate::error::VaultError;
use crate::math::mul_div;
use crate::traits::{AmmAdapter, PositionRegistry};

/// Outcome of a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// Shares burned.
    pub shares: Amount,
    /// Assets paid to the caller.
    pub amounts: AmountPair,
    /// Side paid in native form, for the native variant.
    pub native_side: Option<Side>,
}

impl Withdrawal {
    /// Payout in native form, if the native variant was used.
    #[must_use]
    pub fn native_payout(&self) -> Option<Amount> {
        self.native_side.map(|side| self.amounts.get(side))
    }
}

impl<A> Vault<A>
where
    A: AmmAdapter + PositionRegistry + Clone,
{
    /// Burns `shares` and pays out the same fraction of every position,
    /// uncollected fee and idle balance.
    ///
    /// # Errors
    ///
    /// - [`VaultError::ZeroShares`] if `shares` is zero.
    /// - [`VaultError::InsufficientShares`] if the caller holds fewer.
    /// - [`VaultError::Expired`] if `deadline` has passed.
    /// - [`VaultError::SlippageExceeded`] if the payout is below `min`.
    pub fn remove_liquidity(
        &mut self,
        ctx: &CallContext,
        shares: Amount,
        min: AmountPair,
        deadline: u64,
    ) -> Result<Withdrawal, VaultError> {
        self.transact("remove_liquidity", ctx, |adapter, state| {
            execute(adapter, state, ctx, shares, min, deadline, None)
        })
    }

    /// As [`remove_liquidity`](Self::remove_liquidity), with the
    /// `native_side` leg paid out in native form.
    ///
    /// # Errors
    ///
    /// As [`remove_liquidity`](Self::remove_liquidity), plus
    /// [`VaultError::InvalidConfiguration`] if no native side is
    /// configured.
    pub fn remove_liquidity_native(
        &mut self,
        ctx: &CallContext,
        shares: Amount,
        min: AmountPair,
        deadline: u64,
    ) -> Result<Withdrawal, VaultError> {
        self.transact("remove_liquidity_native", ctx, |adapter, state| {
            let side = state
                .native_side
                .ok_or(VaultError::InvalidConfiguration("vault has no native side"))?;
            execute(adapter, state, ctx, shares, min, deadline, Some(side))
        })
    }
}

fn execute<A: AmmAdapter + PositionRegistry>(
    adapter: &mut A,
    state: &mut VaultState,
    ctx: &CallContext,
    shares: Amount,
    min: AmountPair,
    deadline: u64,
    native_side: Option<Side>,
) -> Result<Withdrawal, VaultError> {
    if shares.is_zero() {
        return Err(VaultError::ZeroShares);
    }
    if state.ledger.balance_of(&ctx.caller) < shares {
        return Err(VaultError::InsufficientShares);
    }
    check_deadline(ctx, deadline)?;

    let supply = state.ledger.total_supply();
    let nav = NavSnapshot::capture(adapter, &state.positions, &state.idle)?.nav()?;
    let entitled = mul_div(nav.get(), shares.get(), supply.get(), Rounding::Down)
        .map(Amount::new)
        .ok_or(VaultError::Overflow("withdrawal entitlement"))?;

    let idle_part = state.idle.pro_rata(shares, supply, Rounding::Down)?;
    state.idle = state.idle.checked_sub(&idle_part)?;
    let mut out = idle_part;

    let occupied: Vec<_> = state.positions.occupied().collect();
    for (index, id, _) in occupied {
        let liquidity = adapter.position_liquidity(id)?;
        let removed = liquidity
            .pro_rata(shares.get(), supply.get(), Rounding::Down)
            .ok_or(VaultError::Overflow("liquidity pro-rata"))?;
        let principal = if removed.is_zero() {
            AmountPair::ZERO
        } else {
            adapter.decrease_position(id, removed)?
        };

        // fees of the whole position are claimed; the rest stays idle
        let fees = adapter.collect_fees(id)?;
        let fee_part = fees.pro_rata(shares, supply, Rounding::Down)?;
        state.idle = state.idle.checked_add(&fees.checked_sub(&fee_part)?)?;

        out = out.checked_add(&principal)?.checked_add(&fee_part)?;
        debug!(
            slot = index,
            position = %id,
            removed = %removed,
            principal = %principal,
            fees = %fee_part,
            "slot withdrawn"
        );
    }

    let held_back = cap_to_entitlement(adapter, &out, entitled)?;
    if !held_back.is_zero() {
        out = out.checked_sub(&held_back)?;
        state.idle = state.idle.checked_add(&held_back)?;
        debug!(held_back = %held_back, entitled = %entitled, "payout capped at nav share");
    }

    if !out.covers(&min) {
        return Err(VaultError::SlippageExceeded);
    }
    state.ledger.burn(ctx.caller, shares)?;
    state.events.push(VaultEvent::Withdrawn {
        account: ctx.caller,
        shares,
        amounts: out,
    });
    info!(caller = %ctx.caller, shares = %shares, amounts = %out, "withdrawal");

    Ok(Withdrawal {
        shares,
        amounts: out,
        native_side,
    })
}

/// Amounts to keep back from `out` so its value does not exceed
/// `entitled`. Asset1 is held back first; asset0 only once asset1 runs out.
fn cap_to_entitlement<A: AmmAdapter>(
    adapter: &A,
    out: &AmountPair,
    entitled: Amount,
) -> Result<AmountPair, VaultError> {
    let paid = pair_value(adapter, out)?;
    let Some(excess) = paid.get().checked_sub(entitled.get()).filter(|e| *e > 0) else {
        return Ok(AmountPair::ZERO);
    };
    let from1 = excess.min(out.amount1.get());
    let mut held = AmountPair::new(Amount::ZERO, Amount::new(from1));
    if from1 == excess {
        return Ok(held);
    }

    let pair = adapter.asset_pair();
    let rest = adapter.quote_spot_value(Amount::new(excess - from1), pair.asset1(), pair.asset0())?;
    let mut from0 = rest.get().saturating_add(1);
    loop {
        held.amount0 = Amount::new(from0.min(out.amount0.get()));
        if held.amount0 == out.amount0 || pair_value(adapter, &out.checked_sub(&held)?)? <= entitled {
            return Ok(held);
        }
        from0 = from0.saturating_mul(2);
    }
}

#[cfg(all(test, feature = "clmm"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, Liquidity};
    use crate::pools::ClmmPool;
    use crate::vault::fixtures::{E18, acct, alice, bob, both, churn, ctx, deep_pool, deposit, vault};

    fn withdraw(v: &mut Vault<ClmmPool>, who: AccountId, shares: Amount) -> Withdrawal {
        let Ok(w) = v.remove_liquidity(&ctx(who), shares, AmountPair::ZERO, u64::MAX) else {
            panic!("withdrawal of {shares} should succeed");
        };
        w
    }

    // -- preconditions --------------------------------------------------------

    #[test]
    fn rejects_zero_and_excess_shares() {
        let mut v = vault();
        let r = deposit(&mut v, alice(), E18);
        assert_eq!(
            v.remove_liquidity(&ctx(alice()), Amount::ZERO, AmountPair::ZERO, u64::MAX),
            Err(VaultError::ZeroShares)
        );
        let Some(too_many) = r.shares.checked_add(&Amount::new(1)) else {
            panic!("add");
        };
        assert_eq!(
            v.remove_liquidity(&ctx(alice()), too_many, AmountPair::ZERO, u64::MAX),
            Err(VaultError::InsufficientShares)
        );
        assert_eq!(
            v.remove_liquidity(&ctx(alice()), r.shares, AmountPair::ZERO, 99),
            Err(VaultError::Expired)
        );
    }

    #[test]
    fn slippage_restores_positions() {
        let mut v = vault();
        let r = deposit(&mut v, alice(), E18);
        let pool = v.adapter().clone();
        assert_eq!(
            v.remove_liquidity(&ctx(alice()), r.shares, r.used, u64::MAX)
                .map(|_| ()),
            Err(VaultError::SlippageExceeded)
        );
        assert_eq!(v.adapter(), &pool);
        assert_eq!(v.balance_of(&alice()), r.shares);
    }

    // -- payouts --------------------------------------------------------------

    #[test]
    fn full_exit_returns_deposit_less_rounding() {
        let mut v = vault();
        let r = deposit(&mut v, alice(), 10 * E18);
        let w = withdraw(&mut v, alice(), r.shares);
        assert!(r.used.covers(&w.amounts));
        assert!(r.used.amount0.get() - w.amounts.amount0.get() < 10);
        assert!(r.used.amount1.get() - w.amounts.amount1.get() < 10);
        assert!(v.total_supply().is_zero());
        for (_, id, _) in v.state.positions.occupied() {
            assert_eq!(v.adapter().position_liquidity(id), Ok(Liquidity::ZERO));
        }
    }

    #[test]
    fn equal_holders_receive_equal_payouts() {
        let mut v = vault();
        let a = deposit(&mut v, alice(), 4 * E18);
        let b = deposit(&mut v, bob(), 4 * E18);
        assert_eq!(a.shares, b.shares);
        let wa = withdraw(&mut v, alice(), a.shares);
        let wb = withdraw(&mut v, bob(), b.shares);
        // floor(L / 2) versus the remainder, per slot
        assert!(wa.amounts.amount0.get().abs_diff(wb.amounts.amount0.get()) <= 10);
        assert!(wa.amounts.amount1.get().abs_diff(wb.amounts.amount1.get()) <= 10);
    }

    #[test]
    fn fees_are_shared_pro_rata_and_rest_goes_idle() {
        let mut v = vault();
        let a = deposit(&mut v, alice(), 10 * E18);
        let _ = deposit(&mut v, bob(), 10 * E18);
        churn(&mut v, 50 * E18, 2);
        let w = withdraw(&mut v, alice(), a.shares);
        // alice got more than she put in thanks to fees
        assert!(w.amounts.amount0 > a.used.amount0 || w.amounts.amount1 > a.used.amount1);
        // bob's fee share is now idle
        assert!(!v.idle_balances().is_zero());
    }

    #[test]
    fn payout_never_exceeds_nav_share() {
        let mut v = vault();
        let holders = [
            (alice(), 3 * E18 + 7),
            (bob(), 11 * E18 + 333),
            (acct(3), 7 * E18 + 1),
        ];
        for (who, amount) in holders {
            let _ = deposit(&mut v, who, amount);
        }
        churn(&mut v, 45 * E18, 3);

        for (who, _) in holders {
            let shares = Amount::new(v.balance_of(&who).get() / 3 + 1);
            let Ok(nav) = v.compute_nav() else {
                panic!("nav");
            };
            let Some(entitled) = mul_div(nav.get(), shares.get(), v.total_supply().get(), Rounding::Down)
            else {
                panic!("entitlement");
            };
            let w = withdraw(&mut v, who, shares);
            let Ok(paid) = pair_value(v.adapter(), &w.amounts) else {
                panic!("value");
            };
            assert!(paid.get() <= entitled, "paid {paid} for an entitlement of {entitled}");
        }
    }

    #[test]
    fn cap_holds_back_asset1_before_asset0() {
        let pool = deep_pool();
        let out = both(10);
        assert_eq!(cap_to_entitlement(&pool, &out, Amount::new(20)), Ok(AmountPair::ZERO));
        assert_eq!(cap_to_entitlement(&pool, &out, Amount::new(25)), Ok(AmountPair::ZERO));
        assert_eq!(
            cap_to_entitlement(&pool, &out, Amount::new(15)),
            Ok(AmountPair::new(Amount::ZERO, Amount::new(5)))
        );

        let short1 = AmountPair::new(Amount::new(10), Amount::new(3));
        let Ok(held) = cap_to_entitlement(&pool, &short1, Amount::new(5)) else {
            panic!("cap");
        };
        assert_eq!(held.amount1, Amount::new(3));
        let Ok(kept) = short1.checked_sub(&held) else {
            panic!("held within payout");
        };
        let Ok(value) = pair_value(&pool, &kept) else {
            panic!("value");
        };
        assert!(value <= Amount::new(5));
    }

    #[test]
    fn native_withdrawal_reports_payout() {
        let mut v = vault();
        let r = deposit(&mut v, alice(), E18);
        let Ok(w) = v.remove_liquidity_native(&ctx(alice()), r.shares, AmountPair::ZERO, u64::MAX)
        else {
            panic!("native withdrawal");
        };
        assert_eq!(w.native_payout(), Some(w.amounts.amount0));
    }
}
