//! Star rating score.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned for scores outside the 1-5 range.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("score must be between 1 and 5 (got {0})")]
pub struct ScoreError(pub i64);

/// A star rating in the inclusive range 1-5.
///
/// ```
/// use storepulse_core::Score;
///
/// assert_eq!(Score::try_from(5).unwrap().get(), 5);
/// assert!(Score::try_from(0).is_err());
/// assert!(Score::try_from(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    /// Lowest allowed score.
    pub const MIN: u8 = 1;
    /// Highest allowed score.
    pub const MAX: u8 = 5;

    /// Get the score value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// The score as an `i32`, for database binding.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0 as i32
    }
}

impl TryFrom<i64> for Score {
    type Error = ScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(Self(value as u8))
        } else {
            Err(ScoreError(value))
        }
    }
}

impl TryFrom<i32> for Score {
    type Error = ScoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        Self::from(score.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range() {
        for value in 1..=5 {
            assert_eq!(Score::try_from(value).unwrap().as_i32(), value);
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(Score::try_from(0), Err(ScoreError(0)));
        assert_eq!(Score::try_from(6), Err(ScoreError(6)));
        assert_eq!(Score::try_from(-3), Err(ScoreError(-3)));
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let ok: Score = serde_json::from_str("4").unwrap();
        assert_eq!(ok.get(), 4);
        assert!(serde_json::from_str::<Score>("9").is_err());
    }

    #[test]
    fn test_serde_serializes_as_number() {
        let json = serde_json::to_string(&Score::try_from(3).unwrap()).unwrap();
        assert_eq!(json, "3");
    }
}
