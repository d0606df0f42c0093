//! Tick indices and the price ranges they bound.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::VaultError;

/// Minimum valid tick index.
const MIN_TICK: i32 = -887_272;

/// Maximum valid tick index.
const MAX_TICK: i32 = 887_272;

/// A discrete price point: `price = 1.0001^tick` (asset1 per asset0).
///
/// Valid indices range from [`MIN`](Self::MIN) to [`MAX`](Self::MAX).
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::Tick;
///
/// assert!(Tick::new(100).is_ok());
/// assert!(Tick::new(900_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Tick(i32);

impl Tick {
    /// Minimum valid tick (`-887272`).
    pub const MIN: Self = Self(MIN_TICK);

    /// Maximum valid tick (`887272`).
    pub const MAX: Self = Self(MAX_TICK);

    /// Tick at which both assets trade one-for-one.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Tick` with range validation.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidTick`] if `value` is outside
    /// `[-887272, 887272]`.
    pub const fn new(value: i32) -> crate::error::Result<Self> {
        if value < MIN_TICK || value > MAX_TICK {
            return Err(VaultError::InvalidTick("tick out of range [-887272, 887272]"));
        }
        Ok(Self(value))
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns `true` if the tick is a multiple of `spacing`.
    #[must_use]
    pub const fn is_aligned(&self, spacing: u32) -> bool {
        spacing != 0 && (self.0 as i64) % (spacing as i64) == 0
    }
}

impl TryFrom<i32> for Tick {
    type Error = VaultError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tick> for i32 {
    fn from(tick: Tick) -> Self {
        tick.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tick({})", self.0)
    }
}

/// A half-open price range `[lower, upper)` with `lower < upper`.
///
/// The current tick is inside the range when `lower <= tick < upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickRange {
    lower: Tick,
    upper: Tick,
}

impl TickRange {
    /// Creates a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidTickRange`] if `lower >= upper`.
    pub const fn new(lower: Tick, upper: Tick) -> crate::error::Result<Self> {
        if lower.get() >= upper.get() {
            return Err(VaultError::InvalidTickRange(
                "lower tick must be less than upper tick",
            ));
        }
        Ok(Self { lower, upper })
    }

    /// Builds a range from raw indices, validating both ticks and their order.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidTick`] or [`VaultError::InvalidTickRange`].
    pub const fn from_indices(lower: i32, upper: i32) -> crate::error::Result<Self> {
        let lower = match Tick::new(lower) {
            Ok(t) => t,
            Err(e) => return Err(e),
        };
        let upper = match Tick::new(upper) {
            Ok(t) => t,
            Err(e) => return Err(e),
        };
        Self::new(lower, upper)
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub const fn lower(&self) -> Tick {
        self.lower
    }

    /// Upper bound (exclusive).
    #[must_use]
    pub const fn upper(&self) -> Tick {
        self.upper
    }

    /// Returns `true` if `tick` lies in `[lower, upper)`.
    #[must_use]
    pub const fn contains(&self, tick: i32) -> bool {
        self.lower.get() <= tick && tick < self.upper.get()
    }

    /// Returns `true` if both bounds are multiples of `spacing`.
    #[must_use]
    pub const fn is_aligned(&self, spacing: u32) -> bool {
        self.lower.is_aligned(spacing) && self.upper.is_aligned(spacing)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower.0, self.upper.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    // -- Tick ---------------------------------------------------------------

    #[test]
    fn bounds_are_inclusive() {
        assert!(Tick::new(MIN_TICK).is_ok());
        assert!(Tick::new(MAX_TICK).is_ok());
        assert_eq!(
            Tick::new(MAX_TICK + 1),
            Err(VaultError::InvalidTick("tick out of range [-887272, 887272]"))
        );
        assert!(Tick::new(MIN_TICK - 1).is_err());
    }

    #[test]
    fn alignment() {
        let Ok(t) = Tick::new(-120) else {
            panic!("valid tick");
        };
        assert!(t.is_aligned(60));
        assert!(!t.is_aligned(50));
        assert!(!t.is_aligned(0));
    }

    #[test]
    fn serde_validates_on_read() {
        let Ok(t) = serde_json::from_str::<Tick>("-600") else {
            panic!("valid tick json");
        };
        assert_eq!(t.get(), -600);
        assert!(serde_json::from_str::<Tick>("1000000").is_err());
    }

    // -- TickRange ----------------------------------------------------------

    #[test]
    fn range_rejects_inverted_and_empty() {
        assert!(TickRange::from_indices(10, 10).is_err());
        assert!(TickRange::from_indices(20, 10).is_err());
        assert!(TickRange::from_indices(-10, 10).is_ok());
    }

    #[test]
    fn range_is_half_open() {
        let Ok(r) = TickRange::from_indices(-60, 60) else {
            panic!("valid range");
        };
        assert!(r.contains(-60));
        assert!(r.contains(59));
        assert!(!r.contains(60));
        assert_eq!(r.to_string(), "[-60, 60)");
    }

    #[test]
    fn range_alignment_checks_both_bounds() {
        let Ok(range) = TickRange::from_indices(-120, 60) else {
            panic!("valid range");
        };
        assert!(range.is_aligned(60));
        assert!(!range.is_aligned(120));
        assert!(!range.is_aligned(0));
        let Ok(range) = TickRange::from_indices(-50, 60) else {
            panic!("valid range");
        };
        assert!(!range.is_aligned(60));
    }
}
