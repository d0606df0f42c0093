//! Read side of the position-handle registry.

use crate::domain::{AmountPair, Liquidity, PositionId};
use crate::error::VaultError;

/// Reports the state of positions held through an [`AmmAdapter`].
///
/// Every live handle minted by `open_or_increase_position` is enumerated by
/// [`PositionRegistry::owned_positions`] until `close_position` burns it.
///
/// [`AmmAdapter`]: super::AmmAdapter
pub trait PositionRegistry {
    /// Current liquidity of `position`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PositionNotFound`] if the handle is unknown.
    fn position_liquidity(&self, position: PositionId) -> Result<Liquidity, VaultError>;

    /// Fees `position` would receive from `collect_fees` right now.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PositionNotFound`] if the handle is unknown.
    fn owed_fees(&self, position: PositionId) -> Result<AmountPair, VaultError>;

    /// All live handles, in ascending order.
    #[must_use]
    fn owned_positions(&self) -> Vec<PositionId>;
}
