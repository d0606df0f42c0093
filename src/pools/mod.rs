//! Feature-gated pool implementations behind the adapter traits.
//!
//! # Pool Types
//!
//! | Feature | Pool | Style |
//! |---------|------|-------|
//! | `clmm` | [`ClmmPool`] | Uniswap V3, integer Q64.96 |

#[cfg(feature = "clmm")]
pub mod clmm;

#[cfg(feature = "clmm")]
pub use clmm::{ClmmPool, SwapOutcome};
