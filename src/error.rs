//! Unified error type for the vault engine and its pool adapters.
//!
//! Every fallible operation in the crate returns [`VaultError`]. Vault entry
//! points are transactional: when one of them returns `Err`, the vault and
//! its adapter are left exactly as they were before the call.

use thiserror::Error;

/// All failure modes of the vault engine, its math helpers and the
/// reference pool.
///
/// Variants carrying a `&'static str` describe which input or invariant
/// was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VaultError {
    /// The caller-supplied deadline is earlier than the current time.
    #[error("deadline expired")]
    Expired,

    /// Amounts actually deployed or returned are below the caller's minimums.
    #[error("slippage exceeded: actual amounts are below the requested minimums")]
    SlippageExceeded,

    /// The operation would mint or burn zero shares.
    #[error("operation would mint zero shares")]
    ZeroShares,

    /// The account does not hold enough shares.
    #[error("insufficient share balance")]
    InsufficientShares,

    /// The spender's allowance does not cover the requested transfer.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// The caller does not hold the role required by the operation.
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// A mutating call was entered while another one was in progress.
    #[error("re-entrant call rejected")]
    Reentrant,

    /// A configuration or slot set is malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// The deposit would push NAV above the configured deposit cap.
    #[error("deposit cap exceeded")]
    DepositCapExceeded,

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A tick index is outside the supported range.
    #[error("invalid tick: {0}")]
    InvalidTick(&'static str),

    /// A tick range is inverted, empty or misaligned.
    #[error("invalid tick range: {0}")]
    InvalidTickRange(&'static str),

    /// A quantity argument is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(&'static str),

    /// An asset is not part of the traded pair.
    #[error("invalid token: {0}")]
    InvalidToken(&'static str),

    /// The pool cannot satisfy the request with its current liquidity.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// No position exists for the given handle.
    #[error("position not found")]
    PositionNotFound,

    /// A price is zero or outside the representable range.
    #[error("invalid price")]
    InvalidPrice,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, VaultError>;
