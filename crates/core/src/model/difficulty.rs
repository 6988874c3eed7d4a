use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DifficultyError {
    #[error("difficulty must be between {min} and {max}, got {provided}")]
    OutOfRange { provided: i64, min: u8, max: u8 },
}

/// Question hardness on a 1–10 scale.
///
/// Also used as the adaptive skill axis: the selector moves a learner along it
/// one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(1);
    pub const MAX: Difficulty = Difficulty(10);
    /// Mid-scale level a fresh session starts from.
    pub const START: Difficulty = Difficulty(5);

    /// Strict constructor.
    ///
    /// # Errors
    ///
    /// Returns `DifficultyError::OutOfRange` outside `1..=10`.
    pub fn new(value: i64) -> Result<Self, DifficultyError> {
        if (i64::from(Self::MIN.0)..=i64::from(Self::MAX.0)).contains(&value) {
            // in range, so the narrowing cannot fail
            Ok(Self(u8::try_from(value).unwrap_or(Self::MAX.0)))
        } else {
            Err(DifficultyError::OutOfRange {
                provided: value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            })
        }
    }

    /// Tolerant constructor used at UI-facing boundaries.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let v = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        Self(u8::try_from(v).unwrap_or(Self::MAX.0))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// One step harder, saturating at `MAX`.
    #[must_use]
    pub fn raise(self) -> Self {
        Self(self.0.saturating_add(1).min(Self::MAX.0))
    }

    /// One step easier, saturating at `MIN`.
    #[must_use]
    pub fn lower(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN.0))
    }

    #[must_use]
    pub fn distance(self, other: Self) -> u8 {
        self.0.abs_diff(other.0)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = DifficultyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(i64::from(value))
    }
}

impl From<Difficulty> for u8 {
    fn from(value: Difficulty) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_constructor_rejects_out_of_range() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(11).is_err());
        assert_eq!(Difficulty::new(7).unwrap().value(), 7);
    }

    #[test]
    fn clamped_constructor_saturates() {
        assert_eq!(Difficulty::clamped(-4), Difficulty::MIN);
        assert_eq!(Difficulty::clamped(99), Difficulty::MAX);
        assert_eq!(Difficulty::clamped(3).value(), 3);
    }

    #[test]
    fn raise_and_lower_stay_in_bounds() {
        assert_eq!(Difficulty::MAX.raise(), Difficulty::MAX);
        assert_eq!(Difficulty::MIN.lower(), Difficulty::MIN);
        assert_eq!(Difficulty::START.raise().value(), 6);
        assert_eq!(Difficulty::START.lower().value(), 4);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Difficulty::clamped(2);
        let b = Difficulty::clamped(9);
        assert_eq!(a.distance(b), 7);
        assert_eq!(b.distance(a), 7);
    }
}
