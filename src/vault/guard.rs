//! Scoped re-entrancy flag.
//!
//! [`ReentrancyGuard::enter`] sets the flag and hands back a [`GuardScope`];
//! dropping the scope clears it, so every exit path of a mutating call,
//! including `?` early returns, releases the guard.
//!
//! Clones share one flag. A handle given to an adapter lets pool callbacks
//! observe that the vault is mid-call and fail with
//! [`VaultError::Reentrant`].

use std::cell::Cell;
use std::rc::Rc;

use crate::error::VaultError;

/// Shared re-entrancy flag.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    entered: Rc<Cell<bool>>,
}

impl ReentrancyGuard {
    /// Creates a released guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the guard for the lifetime of the returned scope.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Reentrant`] if the guard is already held.
    pub fn enter(&self) -> Result<GuardScope, VaultError> {
        if self.entered.replace(true) {
            return Err(VaultError::Reentrant);
        }
        Ok(GuardScope {
            entered: Rc::clone(&self.entered),
        })
    }

    /// Returns `true` while some scope holds the guard.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.entered.get()
    }
}

/// Proof that the guard is held; releases it on drop.
#[derive(Debug)]
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct GuardScope {
    entered: Rc<Cell<bool>>,
}

impl Drop for GuardScope {
    fn drop(&mut self) {
        self.entered.set(false);
    }
}
