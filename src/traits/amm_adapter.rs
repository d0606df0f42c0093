//! The vault's view of the external concentrated-liquidity pool.
//!
//! [`AmmAdapter`] wraps the handful of pool capabilities the vault consumes:
//! opening and growing range positions, shrinking them, collecting their
//! fees, quoting spot value and swapping. The vault never reaches past this
//! trait, so any pool (on-chain binding, simulator, test double) can sit
//! behind it.
//!
//! # Settlement Convention
//!
//! Token movements are reported, not performed: amounts returned from
//! [`AmmAdapter::decrease_position`], [`AmmAdapter::collect_fees`] and
//! [`AmmAdapter::swap_exact`] are credited to the vault's idle balances by
//! the caller, and amounts reported as `used` by
//! [`AmmAdapter::open_or_increase_position`] are debited from them.
//!
//! # Rounding
//!
//! Implementations round in the pool's favour: amounts taken in round up,
//! amounts paid out round down.

use crate::domain::{
    Amount, AmountPair, AssetId, AssetPair, FeeTier, Liquidity, PositionId, Rounding, TickRange,
};
use crate::error::VaultError;

/// Result of adding liquidity to a range position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionIncrease {
    /// Handle of the position that received the liquidity.
    pub position: PositionId,
    /// Liquidity added by this call.
    pub liquidity: Liquidity,
    /// Assets consumed by this call.
    pub used: AmountPair,
}

/// Liquidity-management and trading surface of an external AMM pool.
///
/// # Implementors
///
/// - `ClmmPool` (feature `clmm`), an in-memory integer pool.
///
/// # Errors
///
/// Methods that can fail return [`Result<T, VaultError>`]. Common
/// variants:
///
/// - [`VaultError::PositionNotFound`] for an unknown or closed handle.
/// - [`VaultError::InvalidToken`] for an asset outside the pair.
/// - [`VaultError::SlippageExceeded`] when a swap misses its minimum.
/// - [`VaultError::Overflow`] on arithmetic overflow.
pub trait AmmAdapter {
    /// The pair this pool trades.
    #[must_use]
    fn asset_pair(&self) -> AssetPair;

    /// The pool's fee tier.
    #[must_use]
    fn fee_tier(&self) -> FeeTier;

    /// Grid that range bounds must sit on. Positions whose ticks are not
    /// multiples of it are rejected with [`VaultError::InvalidTickRange`].
    #[must_use]
    fn tick_spacing(&self) -> u32;

    /// Adds as much liquidity to `range` as `desired` can fund.
    ///
    /// With `existing = None` a new position is opened and a fresh handle
    /// returned; otherwise liquidity is added to `existing`, which must
    /// cover `range`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidTickRange`] if `range` is not usable by the
    ///   pool.
    /// - [`VaultError::InvalidQuantity`] if `desired` funds no liquidity.
    /// - [`VaultError::PositionNotFound`] if `existing` is unknown.
    fn open_or_increase_position(
        &mut self,
        existing: Option<PositionId>,
        range: TickRange,
        desired: AmountPair,
    ) -> Result<PositionIncrease, VaultError>;

    /// Removes `liquidity` from `position`, returning the principal freed.
    ///
    /// Fees accrued up to this point stay owed to the position and are
    /// claimed through [`AmmAdapter::collect_fees`].
    ///
    /// # Errors
    ///
    /// - [`VaultError::PositionNotFound`] if `position` is unknown.
    /// - [`VaultError::InsufficientLiquidity`] if `liquidity` exceeds the
    ///   position's liquidity.
    fn decrease_position(
        &mut self,
        position: PositionId,
        liquidity: Liquidity,
    ) -> Result<AmountPair, VaultError>;

    /// Claims every fee owed to `position`. Principal is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PositionNotFound`] if `position` is unknown.
    fn collect_fees(&mut self, position: PositionId) -> Result<AmountPair, VaultError>;

    /// Burns an emptied handle.
    ///
    /// # Errors
    ///
    /// - [`VaultError::PositionNotFound`] if `position` is unknown.
    /// - [`VaultError::InvalidConfiguration`] if liquidity or fees remain.
    fn close_position(&mut self, position: PositionId) -> Result<(), VaultError>;

    /// Value of `amount` of `from` expressed in `to` at the current spot
    /// price, rounded down. Identity when `from == to`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidToken`] if either asset is outside the
    /// pair.
    fn quote_spot_value(
        &self,
        amount: Amount,
        from: AssetId,
        to: AssetId,
    ) -> Result<Amount, VaultError>;

    /// Sells exactly `amount_in` of `from` for `to`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidToken`] if the assets are not the pair's two
    ///   distinct assets.
    /// - [`VaultError::SlippageExceeded`] if the output is below
    ///   `min_amount_out`.
    /// - [`VaultError::InsufficientLiquidity`] if the pool cannot fill it.
    fn swap_exact(
        &mut self,
        from: AssetId,
        to: AssetId,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<Amount, VaultError>;

    /// Amounts `liquidity` spans in `range` at the current price.
    ///
    /// Read-only; used for valuation and for sizing weighted splits.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if an amount exceeds `u128`.
    fn amounts_for_liquidity(
        &self,
        range: TickRange,
        liquidity: Liquidity,
        rounding: Rounding,
    ) -> Result<AmountPair, VaultError>;
}
