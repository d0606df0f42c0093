//! Net asset value, denominated in asset1.
//!
//! Each slot is valued through a per-unit rate: the asset1 value of
//! [`LIQUIDITY_UNIT`] liquidity in the slot's range at the current price.
//! Position value is then `liquidity * rate`, which keeps NAV linear in
//! liquidity. Two identical deposits made back to back therefore add the
//! same value and mint the same shares.
//!
//! Rates are computed from amounts rounded up, i.e. what the pool charges
//! to mint that liquidity, so a deposit is valued at what it actually
//! consumed.
//!
//! Scaled values carry an extra factor of [`LIQUIDITY_UNIT`]; share math
//! runs on scaled values and only [`NavSnapshot::nav`] truncates.

use primitive_types::U256;

use super::allocation::Deployment;
use super::position_set::PositionSet;
use crate::domain::{Amount, AmountPair, Liquidity, Rounding};
use crate::error::VaultError;
use crate::math::{CheckedArithmetic, u256_to_u128};
use crate::traits::{AmmAdapter, PositionRegistry};

/// Reference liquidity used for per-unit rates and weight sizing.
pub const LIQUIDITY_UNIT: u128 = 1_000_000_000_000_000_000;

/// Asset1 value of `amounts` at the current spot price, rounded down.
///
/// # Errors
///
/// Propagates adapter quote errors; [`VaultError::Overflow`] if the sum
/// does not fit.
pub(crate) fn pair_value<A: AmmAdapter>(
    adapter: &A,
    amounts: &AmountPair,
) -> Result<Amount, VaultError> {
    if amounts.amount0.is_zero() {
        return Ok(amounts.amount1);
    }
    let pair = adapter.asset_pair();
    adapter
        .quote_spot_value(amounts.amount0, pair.asset0(), pair.asset1())?
        .safe_add(&amounts.amount1)
}

/// Valuation of one occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotValuation {
    /// Slot index.
    pub index: usize,
    /// Liquidity currently held.
    pub liquidity: Liquidity,
    /// Fees owed but not yet collected.
    pub owed_fees: AmountPair,
}

/// Point-in-time NAV, with the rates needed to value a deposit against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSnapshot {
    rates: Vec<U256>,
    slots: Vec<SlotValuation>,
    fees_value: Amount,
    idle_value: Amount,
    scaled: U256,
}

impl NavSnapshot {
    /// Values every slot, uncollected fee and idle balance.
    ///
    /// # Errors
    ///
    /// Propagates adapter and registry errors; [`VaultError::Overflow`] on
    /// arithmetic overflow.
    pub(crate) fn capture<A: AmmAdapter + PositionRegistry>(
        adapter: &A,
        positions: &PositionSet,
        idle: &AmountPair,
    ) -> Result<Self, VaultError> {
        let unit = Liquidity::new(LIQUIDITY_UNIT);
        let mut rates = Vec::with_capacity(positions.len());
        for slot in positions.as_slice() {
            let amounts = adapter.amounts_for_liquidity(slot.range(), unit, Rounding::Up)?;
            rates.push(U256::from(pair_value(adapter, &amounts)?.get()));
        }

        let mut scaled = U256::zero();
        let mut owed = AmountPair::ZERO;
        let mut slots = Vec::new();
        for (index, id, _) in positions.occupied() {
            let liquidity = adapter.position_liquidity(id)?;
            let owed_fees = adapter.owed_fees(id)?;
            let rate = rates.get(index).copied().unwrap_or_default();
            scaled = U256::from(liquidity.get())
                .checked_mul(rate)
                .and_then(|v| v.checked_add(scaled))
                .ok_or(VaultError::Overflow("position value"))?;
            owed = owed.checked_add(&owed_fees)?;
            slots.push(SlotValuation {
                index,
                liquidity,
                owed_fees,
            });
        }

        let fees_value = pair_value(adapter, &owed)?;
        let idle_value = pair_value(adapter, idle)?;
        let loose = fees_value.safe_add(&idle_value)?;
        scaled = U256::from(loose.get())
            .checked_mul(U256::from(LIQUIDITY_UNIT))
            .and_then(|v| v.checked_add(scaled))
            .ok_or(VaultError::Overflow("net asset value"))?;

        Ok(Self {
            rates,
            slots,
            fees_value,
            idle_value,
            scaled,
        })
    }

    /// NAV in asset1 units, truncated.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if NAV exceeds `u128`.
    pub fn nav(&self) -> Result<Amount, VaultError> {
        let whole = self.scaled / U256::from(LIQUIDITY_UNIT);
        u256_to_u128(whole)
            .map(Amount::new)
            .ok_or(VaultError::Overflow("net asset value"))
    }

    /// Occupied slots that contributed to this snapshot.
    #[must_use]
    pub fn slots(&self) -> &[SlotValuation] {
        &self.slots
    }

    /// Value of uncollected fees.
    #[must_use]
    pub const fn fees_value(&self) -> Amount {
        self.fees_value
    }

    /// Value of idle balances.
    #[must_use]
    pub const fn idle_value(&self) -> Amount {
        self.idle_value
    }

    /// NAV scaled by [`LIQUIDITY_UNIT`].
    pub(crate) const fn scaled(&self) -> U256 {
        self.scaled
    }

    /// Scaled value of the liquidity a deployment added, at this
    /// snapshot's rates.
    pub(crate) fn value_added(&self, deployment: &Deployment) -> Result<U256, VaultError> {
        deployment.slots.iter().try_fold(U256::zero(), |acc, d| {
            let rate = self
                .rates
                .get(d.index)
                .copied()
                .ok_or(VaultError::InvalidConfiguration("slot index out of range"))?;
            U256::from(d.liquidity.get())
                .checked_mul(rate)
                .and_then(|v| v.checked_add(acc))
                .ok_or(VaultError::Overflow("deposit value"))
        })
    }
}
