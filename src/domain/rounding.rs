//! Explicit rounding direction for integer division.

/// Direction in which an inexact integer quotient is rounded.
///
/// Every division in the vault names its direction. Amounts leaving the
/// vault and shares being minted round [`Down`](Self::Down); amounts the
/// vault must receive round [`Up`](Self::Up).
///
/// # Examples
///
/// ```
/// use cellar_vault::domain::Rounding;
///
/// assert!(Rounding::Up.is_up());
/// assert_eq!(Rounding::Down.opposite(), Rounding::Up);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }

    /// Returns the other direction.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Rounding::Up.is_up());
        assert!(!Rounding::Up.is_down());
        assert!(Rounding::Down.is_down());
    }

    #[test]
    fn opposite_round_trips() {
        assert_eq!(Rounding::Up.opposite(), Rounding::Down);
        assert_eq!(Rounding::Down.opposite().opposite(), Rounding::Down);
    }
}
