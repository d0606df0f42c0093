//! Ordered, fixed-size collection of weighted slots.

use crate::config::{SlotConfig, build_slots};
use crate::domain::{PositionId, PositionSlot, TickRange};
use crate::error::VaultError;

/// The vault's weighted ranges and the position handles they hold.
///
/// # Invariants
///
/// - At least one slot; every weight is positive.
/// - A handle is held by at most one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSet {
    slots: Vec<PositionSlot>,
}

impl PositionSet {
    /// Builds an empty-handled set from slot descriptions.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] for an empty or
    /// malformed slot list.
    pub fn from_config(slots: &[SlotConfig]) -> Result<Self, VaultError> {
        Ok(Self {
            slots: build_slots(slots)?,
        })
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PositionSlot> {
        self.slots.get(index)
    }

    /// All slots in order.
    #[must_use]
    pub fn as_slice(&self) -> &[PositionSlot] {
        &self.slots
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.slots.iter().map(|s| u64::from(s.weight())).sum()
    }

    /// `(index, handle, range)` for every occupied slot.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, PositionId, TickRange)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.position().map(|id| (i, id, s.range())))
    }

    /// Handles of every occupied slot, in slot order.
    #[must_use]
    pub fn handles(&self) -> Vec<PositionId> {
        self.occupied().map(|(_, id, _)| id).collect()
    }

    /// Records that slot `index` now holds `id`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] if the index is out of
    /// range, the slot already holds a different handle, or another slot
    /// holds `id`.
    pub(crate) fn occupy(&mut self, index: usize, id: PositionId) -> Result<(), VaultError> {
        if self
            .occupied()
            .any(|(other, held, _)| held == id && other != index)
        {
            return Err(VaultError::InvalidConfiguration(
                "position handle already held by another slot",
            ));
        }
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(VaultError::InvalidConfiguration("slot index out of range"))?;
        match slot.position() {
            Some(held) if held != id => Err(VaultError::InvalidConfiguration(
                "slot already holds a different position",
            )),
            _ => {
                slot.occupy(id);
                Ok(())
            }
        }
    }

    /// Replaces every slot with `slots`, which carry no handles.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidConfiguration`] if the replacement has
    /// a different slot count or any current slot still holds a handle.
    pub(crate) fn replace(&mut self, slots: Vec<PositionSlot>) -> Result<(), VaultError> {
        if slots.len() != self.slots.len() {
            return Err(VaultError::InvalidConfiguration(
                "rebalance must keep the slot count",
            ));
        }
        if self.slots.iter().any(PositionSlot::is_occupied) {
            return Err(VaultError::InvalidConfiguration(
                "slots must be cleared before replacement",
            ));
        }
        self.slots = slots;
        Ok(())
    }

    /// Clears the handle of slot `index`, returning it.
    pub(crate) fn clear(&mut self, index: usize) -> Option<PositionId> {
        self.slots.get_mut(index).and_then(PositionSlot::clear)
    }
}
