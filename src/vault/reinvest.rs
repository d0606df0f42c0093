//! Fee compounding. Validator only; mints no shares.
//!
//! Collected fees join the idle balance, then the vault picks how to put
//! them to work. Each plan is tried on a scratch copy of the pool and the
//! slots, and the first one that leaves NAV at or above its pre-collect
//! level is committed:
//!
//! 1. swap part of the surplus asset toward the slots' ratio (bounded by
//!    the configured slippage), then deploy by weight;
//! 2. deploy the matched part by weight, no swap;
//! 3. leave the fees idle.
//!
//! The last plan never lowers NAV: collected fees were already counted
//! as owed, and valuing them as idle rounds down once instead of twice.
//! Whatever a plan cannot deploy stays idle.

use primitive_types::U256;
use tracing::{debug, info};

use super::allocation::{deploy, weighted_requirements};
use super::position_set::PositionSet;
use super::valuation::{NavSnapshot, pair_value};
use super::{Vault, VaultEvent, VaultState};
use crate::domain::{Amount, AmountPair, AssetPair, BasisPoints, CallContext, Rounding, Side};
use crate::error::VaultError;
use crate::math::{mul_div, mul_div_wide, u256_to_u128};
use crate::traits::{AmmAdapter, PositionRegistry};

/// The rebalancing swap a reinvest made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRecord {
    /// Side sold.
    pub sold: Side,
    /// Amount sold.
    pub amount_in: Amount,
    /// Amount received.
    pub amount_out: Amount,
}

/// Outcome of a reinvest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReinvestOutcome {
    /// Fees collected from the positions.
    pub collected: AmountPair,
    /// The ratio swap, if one was kept.
    pub swap: Option<SwapRecord>,
    /// Assets deployed into positions.
    pub deployed: AmountPair,
}

impl ReinvestOutcome {
    /// Returns `true` if there was nothing to collect.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.collected.is_zero()
    }
}

impl<A> Vault<A>
where
    A: AmmAdapter + PositionRegistry + Clone,
{
    /// Collects fees from every position and redeploys them by weight.
    ///
    /// NAV after the call is never below NAV before it. With nothing to
    /// collect this is a no-op that returns a default outcome.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Unauthorized`] unless the caller is a validator.
    /// - Adapter errors other than a ratio swap missing its slippage
    ///   bound, which only drops the swap.
    pub fn reinvest(&mut self, ctx: &CallContext) -> Result<ReinvestOutcome, VaultError> {
        self.transact("reinvest", ctx, |adapter, state| {
            state.access.require_validator(&ctx.caller)?;
            execute(adapter, state)
        })
    }
}

/// Scratch copy of the pool, the slots and the idle balance that a
/// compounding plan runs against.
struct Trial<A> {
    adapter: A,
    positions: PositionSet,
    idle: AmountPair,
    swap: Option<SwapRecord>,
    deployed: AmountPair,
}

impl<A: AmmAdapter + PositionRegistry + Clone> Trial<A> {
    fn new(adapter: &A, state: &VaultState) -> Self {
        Self {
            adapter: adapter.clone(),
            positions: state.positions.clone(),
            idle: state.idle,
            swap: None,
            deployed: AmountPair::ZERO,
        }
    }

    fn deploy_idle(&mut self) -> Result<(), VaultError> {
        let deployment = deploy(&mut self.adapter, &mut self.positions, self.idle)?;
        self.idle = self.idle.checked_sub(&deployment.used)?;
        self.deployed = deployment.used;
        Ok(())
    }

    fn scaled_nav(&self) -> Result<U256, VaultError> {
        Ok(NavSnapshot::capture(&self.adapter, &self.positions, &self.idle)?.scaled())
    }
}

fn execute<A: AmmAdapter + PositionRegistry + Clone>(
    adapter: &mut A,
    state: &mut VaultState,
) -> Result<ReinvestOutcome, VaultError> {
    let floor = NavSnapshot::capture(adapter, &state.positions, &state.idle)?.scaled();

    let mut collected = AmountPair::ZERO;
    for id in state.positions.handles() {
        collected = collected.checked_add(&adapter.collect_fees(id)?)?;
    }
    if collected.is_zero() {
        debug!("reinvest: nothing to collect");
        return Ok(ReinvestOutcome::default());
    }
    state.idle = state.idle.checked_add(&collected)?;

    let mut kept = None;

    let mut swapped = Trial::new(adapter, state);
    match swap_toward_target(
        &mut swapped.adapter,
        &swapped.positions,
        &mut swapped.idle,
        state.asset_pair,
        state.max_swap_slippage,
    ) {
        Ok(Some(record)) => {
            swapped.swap = Some(record);
            swapped.deploy_idle()?;
            if swapped.scaled_nav()? >= floor {
                kept = Some(swapped);
            } else {
                debug!(sold = ?record.sold, amount_in = %record.amount_in, "ratio swap would lower nav; dropped");
            }
        }
        Ok(None) => {}
        Err(VaultError::SlippageExceeded) => {
            debug!("ratio swap missed its slippage bound; dropped");
        }
        Err(e) => return Err(e),
    }

    if kept.is_none() {
        let mut matched = Trial::new(adapter, state);
        matched.deploy_idle()?;
        if matched.scaled_nav()? >= floor {
            kept = Some(matched);
        } else {
            debug!(deployed = %matched.deployed, "redeploy would lower nav; fees left idle");
        }
    }

    let (swap, deployed) = match kept {
        Some(trial) => {
            *adapter = trial.adapter;
            state.positions = trial.positions;
            state.idle = trial.idle;
            (trial.swap, trial.deployed)
        }
        None => (None, AmountPair::ZERO),
    };

    state.events.push(VaultEvent::Reinvested { collected, deployed });
    info!(
        collected = %collected,
        deployed = %deployed,
        idle = %state.idle,
        swapped = swap.is_some(),
        "reinvest"
    );
    Ok(ReinvestOutcome {
        collected,
        swap,
        deployed,
    })
}

/// Side to sell and how much, so the idle value splits between the assets
/// in the slots' required ratio.
fn plan_swap<A: AmmAdapter>(
    adapter: &A,
    idle: &AmountPair,
    required: &AmountPair,
) -> Result<Option<(Side, Amount)>, VaultError> {
    let value0 = pair_value(adapter, &AmountPair::new(idle.amount0, Amount::ZERO))?;
    let required_value0 = pair_value(adapter, &AmountPair::new(required.amount0, Amount::ZERO))?;
    let required_total = U256::from(required_value0.get()) + U256::from(required.amount1.get());
    if required_total.is_zero() {
        return Ok(None);
    }
    let total = U256::from(value0.get()) + U256::from(idle.amount1.get());
    let target1 = mul_div_wide(
        total,
        U256::from(required.amount1.get()),
        required_total,
        Rounding::Down,
    )
    .and_then(u256_to_u128)
    .ok_or(VaultError::Overflow("target asset1"))?;

    let held1 = idle.amount1.get();
    if held1 < target1 {
        // short asset1: sell the matching share of asset0
        if value0.is_zero() {
            return Ok(None);
        }
        let amount0 = mul_div(idle.amount0.get(), target1 - held1, value0.get(), Rounding::Down)
            .ok_or(VaultError::Overflow("swap amount"))?
            .min(idle.amount0.get());
        Ok((amount0 > 0).then_some((Side::Zero, Amount::new(amount0))))
    } else {
        let amount1 = held1 - target1;
        Ok((amount1 > 0).then_some((Side::One, Amount::new(amount1))))
    }
}

fn swap_toward_target<A: AmmAdapter>(
    adapter: &mut A,
    positions: &PositionSet,
    idle: &mut AmountPair,
    pair: AssetPair,
    max_slippage: BasisPoints,
) -> Result<Option<SwapRecord>, VaultError> {
    let (_, required) = weighted_requirements(adapter, positions)?;
    let Some((sold, amount_in)) = plan_swap(adapter, idle, &required)? else {
        return Ok(None);
    };

    let (from, to) = (pair.asset(sold), pair.asset(sold.other()));
    let quoted = adapter.quote_spot_value(amount_in, from, to)?;
    let min_out = max_slippage.deduct_from(quoted, Rounding::Up)?;
    if quoted.is_zero() || min_out.is_zero() {
        debug!(sold = ?sold, amount_in = %amount_in, "ratio swap too small; skipped");
        return Ok(None);
    }

    let amount_out = adapter.swap_exact(from, to, amount_in, min_out)?;
    let delta_in = AmountPair::ZERO.with(sold, amount_in);
    let delta_out = AmountPair::ZERO.with(sold.other(), amount_out);
    *idle = idle.checked_sub(&delta_in)?.checked_add(&delta_out)?;
    debug!(sold = ?sold, amount_in = %amount_in, amount_out = %amount_out, "ratio swap");
    Ok(Some(SwapRecord {
        sold,
        amount_in,
        amount_out,
    }))
}
