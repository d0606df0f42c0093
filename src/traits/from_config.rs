//! Generic construction trait for building components from configuration.
//!
//! [`FromConfig`] gives every configurable component one uniform
//! constructor: the reference pool builds from a `ClmmPoolConfig`, and a
//! host binding can implement it for its own adapter configuration.
//!
//! # Validation Contract
//!
//! Implementations **must** validate all configuration invariants during
//! construction. A successfully constructed value is guaranteed to be in a
//! valid initial state. Common validations include:
//!
//! - Asset pair has two distinct identities
//! - Fee tier is below 100%
//! - Ticks are in bounds and aligned to the tick spacing
//!
//! # No Generic Blanket Implementation
//!
//! There is no `impl<T> FromConfig<T>` blanket: each component explicitly
//! implements the trait for its own config type, so every pairing is
//! intentional and validation stays component-specific.

use crate::error::VaultError;

/// Construction from a validated configuration.
///
/// # Type Parameters
///
/// - `C`: the configuration type describing the component's immutable
///   parameters.
///
/// # Implementors
///
/// - `impl FromConfig<ClmmPoolConfig> for ClmmPool` (feature `clmm`)
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// The configuration is taken by reference because it may be reused
    /// (for logging, or to build several identical instances).
    ///
    /// # Errors
    ///
    /// - [`VaultError::InvalidConfiguration`] if any parameter is out of
    ///   range or inconsistent.
    /// - [`VaultError::InvalidToken`] if the asset pair is invalid.
    /// - [`VaultError::InvalidTick`] if a tick is misaligned.
    fn from_config(config: &C) -> Result<Self, VaultError>
    where
        Self: Sized;
}
