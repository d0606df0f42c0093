//! Weighted fan-out of assets across the position slots.
//!
//! Deposits, reinvests and rebalances all deploy through [`deploy`]. The
//! split targets liquidity proportional to slot weight:
//!
//! 1. For each slot, quote the amounts `weight * LIQUIDITY_UNIT` liquidity
//!    needs in its range (rounded up).
//! 2. Sum those requirements per asset. Whichever asset runs out first
//!    relative to its requirement binds, giving a common scale factor
//!    `available / required` for every slot.
//! 3. Each slot receives its requirement times that factor (rounded
//!    down), so the sum never exceeds what is available.
//!
//! Slots that would receive less than [`DUST_LIQUIDITY`], or whose share
//! of a needed asset rounds to zero, are skipped. Any other adapter
//! refusal fails the call.

use primitive_types::U256;
use tracing::debug;

use super::position_set::PositionSet;
use super::valuation::LIQUIDITY_UNIT;
use crate::domain::{Amount, AmountPair, Liquidity, PositionId, Rounding};
use crate::error::VaultError;
use crate::math::{mul_div, mul_div_wide};
use crate::traits::AmmAdapter;

/// Smallest liquidity a slot is worth funding.
pub const DUST_LIQUIDITY: u128 = 1_000;

/// Liquidity added to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotDeployment {
    pub index: usize,
    pub position: PositionId,
    pub liquidity: Liquidity,
    pub used: AmountPair,
}

/// Result of a [`deploy`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Deployment {
    pub slots: Vec<SlotDeployment>,
    pub used: AmountPair,
}

/// Per-slot amounts for `weight * LIQUIDITY_UNIT` liquidity, and their sum.
pub(crate) fn weighted_requirements<A: AmmAdapter>(
    adapter: &A,
    positions: &PositionSet,
) -> Result<(Vec<AmountPair>, AmountPair), VaultError> {
    let mut reqs = Vec::with_capacity(positions.len());
    let mut total = AmountPair::ZERO;
    for slot in positions.as_slice() {
        let liquidity = u128::from(slot.weight())
            .checked_mul(LIQUIDITY_UNIT)
            .ok_or(VaultError::Overflow("slot weight"))?;
        let req = adapter.amounts_for_liquidity(slot.range(), Liquidity::new(liquidity), Rounding::Up)?;
        total = total.checked_add(&req)?;
        reqs.push(req);
    }
    Ok((reqs, total))
}

/// The binding side's `(available, required)`, or `None` if nothing can
/// be deployed.
fn binding_ratio(available: &AmountPair, required: &AmountPair) -> Option<(u128, u128)> {
    let (a0, a1) = (available.amount0.get(), available.amount1.get());
    let (r0, r1) = (required.amount0.get(), required.amount1.get());
    match (r0, r1) {
        (0, 0) => None,
        (0, _) => Some((a1, r1)),
        (_, 0) => Some((a0, r0)),
        _ => {
            // a0 / r0 <= a1 / r1  <=>  a0 * r1 <= a1 * r0
            if U256::from(a0) * U256::from(r1) <= U256::from(a1) * U256::from(r0) {
                Some((a0, r0))
            } else {
                Some((a1, r1))
            }
        }
    }
}

/// Desired amounts per slot for splitting `available` by weight, or `None`
/// for slots that would receive dust.
pub(crate) fn plan_split<A: AmmAdapter>(
    adapter: &A,
    positions: &PositionSet,
    available: &AmountPair,
) -> Result<Vec<Option<AmountPair>>, VaultError> {
    let (reqs, total) = weighted_requirements(adapter, positions)?;
    let Some((avail, required)) = binding_ratio(available, &total) else {
        return Ok(vec![None; reqs.len()]);
    };
    if avail == 0 {
        return Ok(vec![None; reqs.len()]);
    }

    let scale = |amount: Amount| {
        mul_div(amount.get(), avail, required, Rounding::Down)
            .map(Amount::new)
            .ok_or(VaultError::Overflow("split amount"))
    };

    positions
        .as_slice()
        .iter()
        .zip(&reqs)
        .map(|(slot, req)| {
            let target = U256::from(slot.weight()) * U256::from(LIQUIDITY_UNIT);
            let expected = mul_div_wide(target, U256::from(avail), U256::from(required), Rounding::Down)
                .ok_or(VaultError::Overflow("expected liquidity"))?;
            if expected < U256::from(DUST_LIQUIDITY) {
                return Ok(None);
            }
            let desired = AmountPair::new(scale(req.amount0)?, scale(req.amount1)?);
            // a side the range needs but that scaled to nothing funds no liquidity
            let starved = (!req.amount0.is_zero() && desired.amount0.is_zero())
                || (!req.amount1.is_zero() && desired.amount1.is_zero());
            Ok((!starved).then_some(desired))
        })
        .collect()
}

/// Splits `available` across the slots by weight and adds the liquidity,
/// opening positions for empty slots.
///
/// The returned `used` never exceeds `available`; the caller owns the
/// remainder.
///
/// # Errors
///
/// Propagates adapter errors, including [`VaultError::InvalidQuantity`]
/// for a slot planned above [`DUST_LIQUIDITY`], and
/// [`VaultError::Overflow`] on arithmetic overflow.
pub(crate) fn deploy<A: AmmAdapter>(
    adapter: &mut A,
    positions: &mut PositionSet,
    available: AmountPair,
) -> Result<Deployment, VaultError> {
    let plan = plan_split(adapter, positions, &available)?;
    let mut deployment = Deployment::default();

    for (index, desired) in plan.into_iter().enumerate() {
        let Some(desired) = desired else {
            debug!(slot = index, "slot skipped: dust");
            continue;
        };
        let Some(slot) = positions.get(index).copied() else {
            return Err(VaultError::InvalidConfiguration("slot index out of range"));
        };
        let increase = adapter.open_or_increase_position(slot.position(), slot.range(), desired)?;
        positions.occupy(index, increase.position)?;
        deployment.used = deployment.used.checked_add(&increase.used)?;
        debug!(
            slot = index,
            position = %increase.position,
            liquidity = %increase.liquidity,
            used = %increase.used,
            "slot funded"
        );
        deployment.slots.push(SlotDeployment {
            index,
            position: increase.position,
            liquidity: increase.liquidity,
            used: increase.used,
        });
    }

    if !available.covers(&deployment.used) {
        return Err(VaultError::InvalidConfiguration(
            "adapter consumed more than the amounts offered",
        ));
    }
    Ok(deployment)
}
