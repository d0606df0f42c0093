//! Position handles and the weighted slots that own them.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::TickRange;
use crate::error::VaultError;

/// Registry handle of one open price-range position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionId(u64);

impl PositionId {
    /// Wraps a raw handle.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One weighted price range of the vault.
///
/// A slot is *occupied* once a deposit has routed value into it and the
/// adapter returned a [`PositionId`]; the handle is cleared when a
/// rebalance closes the position.
///
/// # Invariants
///
/// - `weight > 0`.
/// - `range.lower() < range.upper()` (enforced by [`TickRange`]).
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::{PositionSlot, TickRange};
///
/// let range = TickRange::from_indices(-600, 600).expect("valid range");
/// let slot = PositionSlot::new(range, 5).expect("positive weight");
/// assert_eq!(slot.weight(), 5);
/// assert!(!slot.is_occupied());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSlot {
    range: TickRange,
    weight: u32,
    position: Option<PositionId>,
}

impl PositionSlot {
    /// Creates an empty slot.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] if `weight` is zero.
    pub const fn new(range: TickRange, weight: u32) -> crate::error::Result<Self> {
        if weight == 0 {
            return Err(VaultError::InvalidConfiguration("slot weight must be positive"));
        }
        Ok(Self {
            range,
            weight,
            position: None,
        })
    }

    /// Price range of the slot.
    #[must_use]
    pub const fn range(&self) -> TickRange {
        self.range
    }

    /// Relative weight of the slot.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Handle of the open position, if any.
    #[must_use]
    pub const fn position(&self) -> Option<PositionId> {
        self.position
    }

    /// Returns `true` if the slot holds a position.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.position.is_some()
    }

    pub(crate) fn occupy(&mut self, id: PositionId) {
        self.position = Some(id);
    }

    pub(crate) fn clear(&mut self) -> Option<PositionId> {
        self.position.take()
    }
}
