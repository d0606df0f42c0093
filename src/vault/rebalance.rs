//! Position migration. Owner only; share balances are untouched.

use tracing::{debug, info};

use super::allocation::deploy;
use super::{Vault, VaultEvent, VaultState, check_alignment};
use crate::config::{SlotConfig, build_slots};
use crate::domain::{AmountPair, CallContext, PositionId};
use crate::error::VaultError;
use crate::traits::{AmmAdapter, PositionRegistry};

/// Outcome of a rebalance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebalanceOutcome {
    /// Handles closed.
    pub closed: Vec<PositionId>,
    /// Principal and fees pulled out of the old positions.
    pub withdrawn: AmountPair,
    /// Assets deployed into the new positions.
    pub deployed: AmountPair,
    /// Idle balance left after deployment.
    pub residual: AmountPair,
}

impl<A> Vault<A>
where
    A: AmmAdapter + PositionRegistry + Clone,
{
    /// Closes every position, installs `slots` and redeploys all idle
    /// assets across them by weight.
    ///
    /// The new set must have as many slots as the current one. Assets that
    /// cannot be deployed stay idle and keep counting toward NAV.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Unauthorized`] unless the caller is the owner.
    /// - [`VaultError::InvalidConfiguration`] for a malformed slot set, a
    ///   different slot count, or ticks off the pool's tick grid.
    pub fn rebalance(
        &mut self,
        ctx: &CallContext,
        slots: &[SlotConfig],
    ) -> Result<RebalanceOutcome, VaultError> {
        self.transact("rebalance", ctx, |adapter, state| {
            state.access.require_owner(&ctx.caller)?;
            execute(adapter, state, slots)
        })
    }
}

fn execute<A: AmmAdapter + PositionRegistry>(
    adapter: &mut A,
    state: &mut VaultState,
    slots: &[SlotConfig],
) -> Result<RebalanceOutcome, VaultError> {
    let fresh = build_slots(slots)?;
    if fresh.len() != state.positions.len() {
        return Err(VaultError::InvalidConfiguration(
            "rebalance must keep the slot count",
        ));
    }
    check_alignment(&fresh, adapter.tick_spacing())?;

    let mut withdrawn = AmountPair::ZERO;
    let mut closed = Vec::new();
    let occupied: Vec<_> = state.positions.occupied().collect();
    for (index, id, _) in occupied {
        let liquidity = adapter.position_liquidity(id)?;
        if !liquidity.is_zero() {
            withdrawn = withdrawn.checked_add(&adapter.decrease_position(id, liquidity)?)?;
        }
        withdrawn = withdrawn.checked_add(&adapter.collect_fees(id)?)?;
        adapter.close_position(id)?;
        state.positions.clear(index);
        closed.push(id);
        debug!(slot = index, position = %id, liquidity = %liquidity, "position closed");
    }
    state.idle = state.idle.checked_add(&withdrawn)?;

    state.positions.replace(fresh)?;
    let deployment = deploy(adapter, &mut state.positions, state.idle)?;
    state.idle = state.idle.checked_sub(&deployment.used)?;

    state.events.push(VaultEvent::Rebalanced {
        closed: closed.clone(),
        deployed: deployment.used,
        residual: state.idle,
    });
    info!(
        closed = closed.len(),
        withdrawn = %withdrawn,
        deployed = %deployment.used,
        residual = %state.idle,
        "rebalance"
    );
    Ok(RebalanceOutcome {
        closed,
        withdrawn,
        deployed: deployment.used,
        residual: state.idle,
    })
}

#[cfg(all(test, feature = "clmm"))]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::vault::fixtures::{E18, alice, bob, ctx, deposit, owner, validator, vault};

    fn narrow() -> Vec<SlotConfig> {
        vec![
            SlotConfig::new(-120, 120, 2),
            SlotConfig::new(-240, 240, 2),
            SlotConfig::new(120, 480, 1),
        ]
    }

    #[test]
    fn owner_only() {
        let mut v = vault();
        let _ = deposit(&mut v, alice(), E18);
        assert_eq!(
            v.rebalance(&ctx(validator()), &narrow()).map(|_| ()),
            Err(VaultError::Unauthorized)
        );
    }

    #[test]
    fn keeps_balances_and_replaces_positions() {
        let mut v = vault();
        let a = deposit(&mut v, alice(), 6 * E18);
        let b = deposit(&mut v, bob(), 3 * E18);
        let old = v.adapter().owned_positions();

        let Ok(outcome) = v.rebalance(&ctx(owner()), &narrow()) else {
            panic!("rebalance");
        };
        assert_eq!(outcome.closed, old);
        assert_eq!(v.balance_of(&alice()), a.shares);
        assert_eq!(v.balance_of(&bob()), b.shares);
        assert_eq!(v.total_supply().get(), a.shares.get() + b.shares.get());

        // every old handle is gone; new ones match the new ranges
        let now = v.adapter().owned_positions();
        assert!(now.iter().all(|id| !old.contains(id)));
        assert_eq!(now.len(), 3);
        assert_eq!(v.position_slot(0).map(|s| s.weight()), Some(2));
        assert_eq!(
            outcome.withdrawn.checked_sub(&outcome.deployed),
            Ok(outcome.residual)
        );
        assert_eq!(v.idle_balances(), outcome.residual);
    }

    #[test]
    fn residual_counts_toward_nav() {
        let mut v = vault();
        let _ = deposit(&mut v, alice(), 6 * E18);
        let Ok(nav_before) = v.compute_nav() else {
            panic!("nav");
        };
        let Ok(outcome) = v.rebalance(&ctx(owner()), &narrow()) else {
            panic!("rebalance");
        };
        // the out-of-range slot only takes asset0, so some asset1 is left over
        assert!(!outcome.residual.is_zero());
        let Ok(nav_after) = v.compute_nav() else {
            panic!("nav");
        };
        assert!(nav_after.get().abs_diff(nav_before.get()) < 1_000_000);
    }

    #[test]
    fn slot_count_must_match() {
        let mut v = vault();
        let Err(VaultError::InvalidConfiguration(_)) =
            v.rebalance(&ctx(owner()), &narrow()[..2])
        else {
            panic!("fewer slots must fail");
        };
        let Err(VaultError::InvalidConfiguration(_)) =
            v.rebalance(&ctx(owner()), &[SlotConfig::new(-60, 60, 0); 3])
        else {
            panic!("zero weights must fail");
        };
    }

    #[test]
    fn misaligned_slots_are_rejected_before_touching_positions() {
        let mut v = vault();
        let _ = deposit(&mut v, alice(), 4 * E18);
        let pool = v.adapter().clone();
        let slots = v.position_slots().to_vec();
        let off_grid = [
            SlotConfig::new(-120, 120, 2),
            SlotConfig::new(-50, 50, 1),
            SlotConfig::new(120, 480, 1),
        ];
        assert_eq!(
            v.rebalance(&ctx(owner()), &off_grid).map(|_| ()),
            Err(VaultError::InvalidConfiguration(
                "slot ticks must align to the pool tick spacing"
            ))
        );
        assert_eq!(v.adapter(), &pool);
        assert_eq!(v.position_slots(), slots.as_slice());
    }

    #[test]
    fn empty_vault_rebalance_just_swaps_slots() {
        let mut v = vault();
        let Ok(outcome) = v.rebalance(&ctx(owner()), &narrow()) else {
            panic!("rebalance");
        };
        assert!(outcome.closed.is_empty());
        assert!(outcome.deployed.is_zero());
        assert_eq!(v.position_slot(2).map(|s| s.range().lower().get()), Some(120));
    }
}
