//! In-memory concentrated-liquidity pool (Uniswap V3 style), integer only.
//!
//! Liquidity is concentrated within tick ranges. Within a single range the
//! pool behaves as a constant-product curve parameterised by `√P` and `L`.
//!
//! # Price Convention
//!
//! `price = 1.0001^tick` (asset1 per asset0). The authoritative price is
//! `sqrt_price`, a Q64.96 `U256`; `current_tick` is the greatest tick whose
//! sqrt price does not exceed it, except directly after crossing an
//! initialised tick downwards, where it sits one below that tick.
//!
//! # Swap Algorithm
//!
//! 1. Deduct the fee from the remaining input.
//! 2. Compute how much input the current range absorbs before the next
//!    initialised tick.
//! 3. If the remaining input exceeds that capacity, consume the range,
//!    cross the tick, update active liquidity, and repeat.
//! 4. Accumulate output from each step.
//!
//! # Fee Tracking
//!
//! Global `fee_growth_global{0,1}` counters track fees per unit of
//! liquidity in Q128. Per-tick `fee_growth_outside` values and per-position
//! `fee_growth_inside_last` snapshots give each position its share. All
//! fee-growth arithmetic wraps modulo 2^256.

use std::collections::BTreeMap;

use primitive_types::U256;
use tracing::debug;

use crate::config::ClmmPoolConfig;
use crate::domain::{
    Amount, AmountPair, AssetId, AssetPair, FeeTier, Liquidity, PIPS_DENOMINATOR, PositionId,
    Rounding, Side, Tick, TickRange,
};
use crate::error::VaultError;
use crate::math::{
    CheckedArithmetic, amount0_delta, amount1_delta, amounts_for_liquidity,
    liquidity_for_amounts, mul_div, mul_div_wide, next_sqrt_price_from_input, sqrt_price_at_tick,
    tick_at_sqrt_price, u256_to_u128, value_at_sqrt_price,
};
use crate::traits::{AmmAdapter, FromConfig, PositionIncrease, PositionRegistry};

/// Upper bound on swap steps; each step crosses at most one tick.
const MAX_SWAP_STEPS: u32 = 10_000;

/// `2^128`, the fee-growth unit.
fn q128() -> U256 {
    U256::one() << 128u32
}

fn wrapping_add(a: U256, b: U256) -> U256 {
    a.overflowing_add(b).0
}

fn wrapping_sub(a: U256, b: U256) -> U256 {
    a.overflowing_sub(b).0
}

// ---------------------------------------------------------------------------
// Internal data structures
// ---------------------------------------------------------------------------

/// Per-tick state stored in the tick map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct TickState {
    /// Total liquidity referencing this tick.
    liquidity_gross: u128,
    /// Net liquidity change when crossing this tick left-to-right.
    liquidity_net: i128,
    /// Fee growth (asset0) on the other side of this tick.
    fee_growth_outside0: U256,
    /// Fee growth (asset1) on the other side of this tick.
    fee_growth_outside1: U256,
}

/// A handle-owned position.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PoolPosition {
    range: TickRange,
    liquidity: u128,
    fee_growth_inside_last0: U256,
    fee_growth_inside_last1: U256,
    /// Fees credited but not yet collected.
    tokens_owed: AmountPair,
}

/// Totals of one executed swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    /// Input consumed, fee included.
    pub amount_in: Amount,
    /// Output paid.
    pub amount_out: Amount,
    /// Fee retained for liquidity providers.
    pub fee: Amount,
}

// ---------------------------------------------------------------------------
// ClmmPool
// ---------------------------------------------------------------------------

/// An integer concentrated-liquidity pool with position handles.
///
/// Created from a [`ClmmPoolConfig`] via [`FromConfig`]. Implements
/// [`AmmAdapter`] and [`PositionRegistry`], so a
/// [`Vault`](crate::vault::Vault) can run against it directly.
///
/// # State
///
/// - `sqrt_price`: Q64.96 square root of the price.
/// - `current_tick`: tick index tracking `sqrt_price`.
/// - `liquidity`: liquidity active at `current_tick`.
/// - `fee_growth_global{0,1}`: cumulative fees per unit of liquidity (Q128).
/// - `ticks`: `BTreeMap<i32, TickState>` of initialised ticks.
/// - `positions`: handle-owned positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClmmPool {
    asset_pair: AssetPair,
    fee_tier: FeeTier,
    tick_spacing: u32,
    sqrt_price: U256,
    current_tick: i32,
    liquidity: u128,
    fee_growth_global0: U256,
    fee_growth_global1: U256,
    ticks: BTreeMap<i32, TickState>,
    positions: BTreeMap<PositionId, PoolPosition>,
    next_position: u64,
}

impl ClmmPool {
    /// Returns the Q64.96 sqrt price.
    #[must_use]
    pub const fn sqrt_price(&self) -> U256 {
        self.sqrt_price
    }

    /// Returns the current tick index.
    #[must_use]
    pub const fn current_tick(&self) -> i32 {
        self.current_tick
    }

    /// Returns the liquidity active at the current tick.
    #[must_use]
    pub const fn active_liquidity(&self) -> Liquidity {
        Liquidity::new(self.liquidity)
    }

    /// Returns the tick spacing.
    #[must_use]
    pub const fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Returns the number of handle-owned positions.
    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the global fee growth for asset0 and asset1 (Q128).
    #[must_use]
    pub const fn fee_growth_global(&self) -> (U256, U256) {
        (self.fee_growth_global0, self.fee_growth_global1)
    }

    /// Sells exactly `amount_in` of the asset on side `from`.
    ///
    /// The swap either fills completely or leaves the pool untouched.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidQuantity`] if `amount_in` is zero.
    /// - [`VaultError::InsufficientLiquidity`] if the pool cannot absorb
    ///   the full input or the output rounds to zero.
    /// - [`VaultError::Overflow`] on arithmetic overflow.
    pub fn swap(&mut self, from: Side, amount_in: Amount) -> Result<SwapOutcome, VaultError> {
        if amount_in.is_zero() {
            return Err(VaultError::InvalidQuantity("swap input must be nonzero"));
        }
        let saved = self.clone();
        match self.execute_swap_exact_in(amount_in, from == Side::Zero) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                *self = saved;
                Err(e)
            }
        }
    }

    fn tick_sqrt_price(tick: i32) -> Result<U256, VaultError> {
        Ok(sqrt_price_at_tick(Tick::new(tick)?))
    }

    fn range_sqrt_prices(range: TickRange) -> (U256, U256) {
        (
            sqrt_price_at_tick(range.lower()),
            sqrt_price_at_tick(range.upper()),
        )
    }

    /// Finds the next initialised tick in the swap direction.
    ///
    /// Moving down (`zero_for_one`) the search includes `current_tick`
    /// itself; moving up it starts strictly above.
    fn next_initialized_tick(&self, zero_for_one: bool) -> Option<i32> {
        if zero_for_one {
            self.ticks
                .range(..=self.current_tick)
                .next_back()
                .map(|(&t, _)| t)
        } else {
            self.ticks
                .range((
                    std::ops::Bound::Excluded(self.current_tick),
                    std::ops::Bound::Unbounded,
                ))
                .next()
                .map(|(&t, _)| t)
        }
    }

    /// Computes fee growth inside `range` for both assets.
    fn fee_growth_inside(&self, range: TickRange) -> (U256, U256) {
        let lower = range.lower().get();
        let upper = range.upper().get();
        let zero = TickState::default();
        let lower_state = self.ticks.get(&lower).unwrap_or(&zero);
        let upper_state = self.ticks.get(&upper).unwrap_or(&zero);

        let (below0, below1) = if self.current_tick >= lower {
            (lower_state.fee_growth_outside0, lower_state.fee_growth_outside1)
        } else {
            (
                wrapping_sub(self.fee_growth_global0, lower_state.fee_growth_outside0),
                wrapping_sub(self.fee_growth_global1, lower_state.fee_growth_outside1),
            )
        };

        let (above0, above1) = if self.current_tick < upper {
            (upper_state.fee_growth_outside0, upper_state.fee_growth_outside1)
        } else {
            (
                wrapping_sub(self.fee_growth_global0, upper_state.fee_growth_outside0),
                wrapping_sub(self.fee_growth_global1, upper_state.fee_growth_outside1),
            )
        };

        (
            wrapping_sub(wrapping_sub(self.fee_growth_global0, below0), above0),
            wrapping_sub(wrapping_sub(self.fee_growth_global1, below1), above1),
        )
    }

    /// Crosses `tick`, flipping its fee-growth-outside and applying its
    /// liquidity delta in the direction of travel.
    fn cross_tick(&mut self, tick: i32, left_to_right: bool) -> Result<(), VaultError> {
        let Some(state) = self.ticks.get_mut(&tick) else {
            return Ok(());
        };
        state.fee_growth_outside0 =
            wrapping_sub(self.fee_growth_global0, state.fee_growth_outside0);
        state.fee_growth_outside1 =
            wrapping_sub(self.fee_growth_global1, state.fee_growth_outside1);
        let net = if left_to_right {
            state.liquidity_net
        } else {
            state
                .liquidity_net
                .checked_neg()
                .ok_or(VaultError::Overflow("liquidity net negation"))?
        };
        self.liquidity = self
            .liquidity
            .checked_add_signed(net)
            .ok_or(VaultError::Overflow("active liquidity after tick cross"))?;
        Ok(())
    }

    /// Applies `delta` to one bound of a range. Returns `true` if the tick
    /// flipped between initialised and uninitialised.
    fn update_tick(&mut self, tick: i32, delta: i128, upper: bool) -> Result<bool, VaultError> {
        let current_tick = self.current_tick;
        let (global0, global1) = (self.fee_growth_global0, self.fee_growth_global1);
        let state = self.ticks.entry(tick).or_default();
        let gross_before = state.liquidity_gross;
        let gross_after = gross_before
            .checked_add_signed(delta)
            .ok_or(VaultError::InsufficientLiquidity)?;
        if gross_before == 0 && tick <= current_tick {
            // growth so far is attributed to the region below the tick
            state.fee_growth_outside0 = global0;
            state.fee_growth_outside1 = global1;
        }
        state.liquidity_gross = gross_after;
        state.liquidity_net = if upper {
            state.liquidity_net.checked_sub(delta)
        } else {
            state.liquidity_net.checked_add(delta)
        }
        .ok_or(VaultError::Overflow("tick liquidity net"))?;
        Ok((gross_before == 0) != (gross_after == 0))
    }

    /// Adds signed liquidity to `range`: tick bounds plus active liquidity.
    ///
    /// Returns which bounds flipped so callers can clear them afterwards.
    fn apply_liquidity(&mut self, range: TickRange, delta: i128) -> Result<(bool, bool), VaultError> {
        if delta == 0 {
            return Ok((false, false));
        }
        let flipped_lower = self.update_tick(range.lower().get(), delta, false)?;
        let flipped_upper = self.update_tick(range.upper().get(), delta, true)?;
        if range.contains(self.current_tick) {
            self.liquidity = self
                .liquidity
                .checked_add_signed(delta)
                .ok_or(VaultError::InsufficientLiquidity)?;
        }
        Ok((flipped_lower, flipped_upper))
    }

    fn clear_flipped(&mut self, range: TickRange, flipped: (bool, bool)) {
        if flipped.0 {
            self.ticks.remove(&range.lower().get());
        }
        if flipped.1 {
            self.ticks.remove(&range.upper().get());
        }
    }

    /// Fees accrued by `position` beyond its snapshot.
    fn accrued_fees(position: &PoolPosition, inside: (U256, U256)) -> Result<AmountPair, VaultError> {
        let liquidity = U256::from(position.liquidity);
        let owed = |now: U256, last: U256| -> Result<Amount, VaultError> {
            let growth = wrapping_sub(now, last);
            mul_div_wide(liquidity, growth, q128(), Rounding::Down)
                .and_then(u256_to_u128)
                .map(Amount::new)
                .ok_or(VaultError::Overflow("owed fees"))
        };
        Ok(AmountPair::new(
            owed(inside.0, position.fee_growth_inside_last0)?,
            owed(inside.1, position.fee_growth_inside_last1)?,
        ))
    }

    /// Changes a position's liquidity by `delta`, crediting fees accrued
    /// at the old liquidity to `tokens_owed`.
    fn modify_position(&mut self, id: PositionId, delta: i128) -> Result<(), VaultError> {
        let range = self
            .positions
            .get(&id)
            .ok_or(VaultError::PositionNotFound)?
            .range;
        let flipped = self.apply_liquidity(range, delta)?;
        let inside = self.fee_growth_inside(range);
        let position = self
            .positions
            .get_mut(&id)
            .ok_or(VaultError::PositionNotFound)?;
        let fees = Self::accrued_fees(position, inside)?;
        position.tokens_owed = position.tokens_owed.checked_add(&fees)?;
        position.fee_growth_inside_last0 = inside.0;
        position.fee_growth_inside_last1 = inside.1;
        position.liquidity = position
            .liquidity
            .checked_add_signed(delta)
            .ok_or(VaultError::InsufficientLiquidity)?;
        if delta < 0 {
            self.clear_flipped(range, flipped);
        }
        Ok(())
    }

    fn to_signed(liquidity: Liquidity) -> Result<i128, VaultError> {
        i128::try_from(liquidity.get()).map_err(|_| VaultError::Overflow("liquidity exceeds i128"))
    }

    fn ensure_aligned(&self, range: TickRange) -> Result<(), VaultError> {
        if range.is_aligned(self.tick_spacing) {
            Ok(())
        } else {
            Err(VaultError::InvalidTickRange(
                "ticks must be aligned to tick spacing",
            ))
        }
    }

    fn credit_fee(&mut self, fee: Amount, zero_for_one: bool) -> Result<(), VaultError> {
        if fee.is_zero() || self.liquidity == 0 {
            return Ok(());
        }
        let growth = mul_div_wide(
            U256::from(fee.get()),
            q128(),
            U256::from(self.liquidity),
            Rounding::Down,
        )
        .ok_or(VaultError::Overflow("fee growth"))?;
        if zero_for_one {
            self.fee_growth_global0 = wrapping_add(self.fee_growth_global0, growth);
        } else {
            self.fee_growth_global1 = wrapping_add(self.fee_growth_global1, growth);
        }
        Ok(())
    }

    /// Executes an exact-in swap.
    ///
    /// `zero_for_one`: selling asset0 for asset1 (price decreases).
    fn execute_swap_exact_in(
        &mut self,
        amount_in: Amount,
        zero_for_one: bool,
    ) -> Result<SwapOutcome, VaultError> {
        let fee_pips = u128::from(self.fee_tier.pips());
        let denominator = u128::from(PIPS_DENOMINATOR);
        let mut remaining = amount_in;
        let mut total_out = Amount::ZERO;
        let mut total_fee = Amount::ZERO;
        let mut steps = 0u32;

        while !remaining.is_zero() {
            steps += 1;
            if steps > MAX_SWAP_STEPS {
                return Err(VaultError::InsufficientLiquidity);
            }

            let next_tick = self.next_initialized_tick(zero_for_one);
            let boundary = if zero_for_one { Tick::MIN } else { Tick::MAX };
            let target = match next_tick {
                Some(t) => Self::tick_sqrt_price(t)?,
                None => sqrt_price_at_tick(boundary),
            };

            if self.liquidity == 0 {
                // nothing to trade against: jump to the next initialised tick
                let Some(t) = next_tick else {
                    break;
                };
                self.sqrt_price = target;
                self.cross_tick(t, !zero_for_one)?;
                self.current_tick = if zero_for_one { t - 1 } else { t };
                continue;
            }

            let liquidity = Liquidity::new(self.liquidity);
            let less_fee = Amount::new(
                mul_div(remaining.get(), denominator - fee_pips, denominator, Rounding::Down)
                    .ok_or(VaultError::Overflow("input less fee"))?,
            );
            let max_in = if zero_for_one {
                amount0_delta(target, self.sqrt_price, liquidity, Rounding::Up)?
            } else {
                amount1_delta(self.sqrt_price, target, liquidity, Rounding::Up)?
            };

            let (next_price, step_in, step_fee) = if less_fee >= max_in {
                let fee = mul_div(max_in.get(), fee_pips, denominator - fee_pips, Rounding::Up)
                    .ok_or(VaultError::Overflow("step fee"))?;
                (target, max_in, Amount::new(fee))
            } else {
                let next =
                    next_sqrt_price_from_input(self.sqrt_price, liquidity, less_fee, zero_for_one)?;
                let step_in = if zero_for_one {
                    amount0_delta(next, self.sqrt_price, liquidity, Rounding::Up)?
                } else {
                    amount1_delta(self.sqrt_price, next, liquidity, Rounding::Up)?
                };
                // the whole remainder is spent; whatever is not input is fee
                (next, step_in, remaining.saturating_sub(&step_in))
            };

            let step_out = if zero_for_one {
                amount1_delta(next_price, self.sqrt_price, liquidity, Rounding::Down)?
            } else {
                amount0_delta(self.sqrt_price, next_price, liquidity, Rounding::Down)?
            };

            let consumed = step_in.safe_add(&step_fee)?;
            remaining = remaining.saturating_sub(&consumed);
            total_out = total_out.safe_add(&step_out)?;
            total_fee = total_fee.safe_add(&step_fee)?;
            self.credit_fee(step_fee, zero_for_one)?;
            self.sqrt_price = next_price;

            if next_price == target {
                let Some(t) = next_tick else {
                    break;
                };
                self.cross_tick(t, !zero_for_one)?;
                self.current_tick = if zero_for_one { t - 1 } else { t };
            } else {
                self.current_tick = tick_at_sqrt_price(self.sqrt_price)?.get();
            }
        }

        if !remaining.is_zero() || total_out.is_zero() {
            return Err(VaultError::InsufficientLiquidity);
        }

        debug!(
            zero_for_one,
            amount_in = %amount_in,
            amount_out = %total_out,
            fee = %total_fee,
            tick = self.current_tick,
            "clmm swap executed"
        );

        Ok(SwapOutcome {
            amount_in,
            amount_out: total_out,
            fee: total_fee,
        })
    }
}

impl FromConfig<ClmmPoolConfig> for ClmmPool {
    /// Creates a new pool from the given configuration.
    ///
    /// Seed liquidity is loaded into the tick map; it earns fees but has no
    /// handle.
    ///
    /// # Errors
    ///
    /// - Propagates any error from [`ClmmPoolConfig::validate`].
    fn from_config(config: &ClmmPoolConfig) -> Result<Self, VaultError> {
        config.validate()?;

        let initial_tick = config.initial_tick();
        let mut pool = Self {
            asset_pair: *config.asset_pair(),
            fee_tier: config.fee_tier(),
            tick_spacing: config.tick_spacing(),
            sqrt_price: sqrt_price_at_tick(initial_tick),
            current_tick: initial_tick.get(),
            liquidity: 0,
            fee_growth_global0: U256::zero(),
            fee_growth_global1: U256::zero(),
            ticks: BTreeMap::new(),
            positions: BTreeMap::new(),
            next_position: 1,
        };

        for seed in config.seed_liquidity() {
            let range = TickRange::from_indices(seed.tick_lower, seed.tick_upper)?;
            pool.apply_liquidity(range, Self::to_signed(seed.liquidity)?)?;
        }

        Ok(pool)
    }
}

impl AmmAdapter for ClmmPool {
    fn asset_pair(&self) -> AssetPair {
        self.asset_pair
    }

    fn fee_tier(&self) -> FeeTier {
        self.fee_tier
    }

    fn tick_spacing(&self) -> u32 {
        self.tick_spacing
    }

    /// Mints the largest liquidity `desired` funds at the current price.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidTickRange`] if the range is misaligned or does
    ///   not match `existing`'s range.
    /// - [`VaultError::InvalidQuantity`] if no liquidity can be funded.
    /// - [`VaultError::PositionNotFound`] if `existing` is unknown.
    fn open_or_increase_position(
        &mut self,
        existing: Option<PositionId>,
        range: TickRange,
        desired: AmountPair,
    ) -> Result<PositionIncrease, VaultError> {
        self.ensure_aligned(range)?;
        let (sqrt_a, sqrt_b) = Self::range_sqrt_prices(range);
        let liquidity = liquidity_for_amounts(self.sqrt_price, sqrt_a, sqrt_b, desired)?;
        if liquidity.is_zero() {
            return Err(VaultError::InvalidQuantity(
                "desired amounts fund no liquidity",
            ));
        }
        let used = amounts_for_liquidity(self.sqrt_price, sqrt_a, sqrt_b, liquidity, Rounding::Up)?;

        let id = match existing {
            Some(id) => {
                let position = self.positions.get(&id).ok_or(VaultError::PositionNotFound)?;
                if position.range != range {
                    return Err(VaultError::InvalidTickRange(
                        "position range does not match requested range",
                    ));
                }
                id
            }
            None => {
                let id = PositionId::new(self.next_position);
                self.next_position += 1;
                self.positions.insert(
                    id,
                    PoolPosition {
                        range,
                        liquidity: 0,
                        fee_growth_inside_last0: U256::zero(),
                        fee_growth_inside_last1: U256::zero(),
                        tokens_owed: AmountPair::ZERO,
                    },
                );
                id
            }
        };
        self.modify_position(id, Self::to_signed(liquidity)?)?;

        debug!(position = %id, range = %range, liquidity = %liquidity, used = %used, "liquidity added");
        Ok(PositionIncrease {
            position: id,
            liquidity,
            used,
        })
    }

    fn decrease_position(
        &mut self,
        position: PositionId,
        liquidity: Liquidity,
    ) -> Result<AmountPair, VaultError> {
        let current = self
            .positions
            .get(&position)
            .ok_or(VaultError::PositionNotFound)?;
        if liquidity.get() > current.liquidity {
            return Err(VaultError::InsufficientLiquidity);
        }
        let range = current.range;
        let delta = Self::to_signed(liquidity)?
            .checked_neg()
            .ok_or(VaultError::Overflow("liquidity negation"))?;
        self.modify_position(position, delta)?;
        let (sqrt_a, sqrt_b) = Self::range_sqrt_prices(range);
        amounts_for_liquidity(self.sqrt_price, sqrt_a, sqrt_b, liquidity, Rounding::Down)
    }

    fn collect_fees(&mut self, position: PositionId) -> Result<AmountPair, VaultError> {
        // a zero modification credits everything accrued so far
        self.modify_position(position, 0)?;
        let position = self
            .positions
            .get_mut(&position)
            .ok_or(VaultError::PositionNotFound)?;
        Ok(core::mem::take(&mut position.tokens_owed))
    }

    fn close_position(&mut self, position: PositionId) -> Result<(), VaultError> {
        if self.position_liquidity(position)?.is_zero() && self.owed_fees(position)?.is_zero() {
            self.positions.remove(&position);
            Ok(())
        } else {
            Err(VaultError::InvalidConfiguration(
                "position still holds liquidity or fees",
            ))
        }
    }

    fn quote_spot_value(
        &self,
        amount: Amount,
        from: AssetId,
        to: AssetId,
    ) -> Result<Amount, VaultError> {
        let from = self.asset_pair.side_of(from)?;
        let to = self.asset_pair.side_of(to)?;
        if from == to {
            return Ok(amount);
        }
        value_at_sqrt_price(self.sqrt_price, amount, from == Side::Zero, Rounding::Down)
    }

    fn swap_exact(
        &mut self,
        from: AssetId,
        to: AssetId,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<Amount, VaultError> {
        let from = self.asset_pair.side_of(from)?;
        if self.asset_pair.side_of(to)? == from {
            return Err(VaultError::InvalidToken("cannot swap an asset for itself"));
        }
        let saved = self.clone();
        let outcome = self.swap(from, amount_in)?;
        if outcome.amount_out < min_amount_out {
            *self = saved;
            return Err(VaultError::SlippageExceeded);
        }
        Ok(outcome.amount_out)
    }

    fn amounts_for_liquidity(
        &self,
        range: TickRange,
        liquidity: Liquidity,
        rounding: Rounding,
    ) -> Result<AmountPair, VaultError> {
        let (sqrt_a, sqrt_b) = Self::range_sqrt_prices(range);
        amounts_for_liquidity(self.sqrt_price, sqrt_a, sqrt_b, liquidity, rounding)
    }
}

impl PositionRegistry for ClmmPool {
    fn position_liquidity(&self, position: PositionId) -> Result<Liquidity, VaultError> {
        self.positions
            .get(&position)
            .map(|p| Liquidity::new(p.liquidity))
            .ok_or(VaultError::PositionNotFound)
    }

    fn owed_fees(&self, position: PositionId) -> Result<AmountPair, VaultError> {
        let p = self
            .positions
            .get(&position)
            .ok_or(VaultError::PositionNotFound)?;
        let accrued = Self::accrued_fees(p, self.fee_growth_inside(p.range))?;
        p.tokens_owed.checked_add(&accrued)
    }

    fn owned_positions(&self) -> Vec<PositionId> {
        self.positions.keys().copied().collect()
    }
}
