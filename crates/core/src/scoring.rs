//! Score aggregation and leaderboard ordering.
//!
//! Averages are kept as fixed-point hundredths computed with integer
//! arithmetic, so the same vote set always yields the same value and the
//! same ordering regardless of platform float behaviour.

use std::cmp::Ordering;
use std::fmt;

use molts_common::{AppError, AppResult};
use molts_db::entities::performance;
use molts_db::repositories::VoteTally;
use serde::{Serialize, Serializer};

/// Lowest accepted score.
pub const MIN_SCORE: i64 = 1;
/// Highest accepted score.
pub const MAX_SCORE: i64 = 10;

/// A validated vote score in `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(u8);

impl Score {
    /// Validate a raw integer score.
    pub fn new(value: i64) -> AppResult<Self> {
        if (MIN_SCORE..=MAX_SCORE).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AppError::InvalidInput(
                "Score must be between 1 and 10".to_string(),
            ))
        }
    }

    /// Validate a JSON score value.
    ///
    /// Only JSON integers are accepted; `7.5`, `7.0`, `"7"` and `true` are
    /// rejected rather than coerced.
    pub fn from_json(value: &serde_json::Value) -> AppResult<Self> {
        match value.as_i64() {
            Some(n) => Self::new(n),
            None => Err(AppError::InvalidInput(
                "Score must be an integer between 1 and 10".to_string(),
            )),
        }
    }

    /// The score as stored in `votes.score`.
    #[must_use]
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }
}

/// Mean score with two decimal places, rounded half-up.
///
/// Zero when there are no votes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AverageScore {
    hundredths: u32,
}

impl AverageScore {
    /// Average of a performance without votes.
    pub const ZERO: Self = Self { hundredths: 0 };

    /// Average from a vote count and score sum.
    #[must_use]
    pub fn from_totals(score_sum: i64, total_votes: i64) -> Self {
        if total_votes <= 0 || score_sum <= 0 {
            return Self::ZERO;
        }
        // floor(sum / n * 100 + 1/2) == floor((200 * sum + n) / (2 * n))
        let hundredths = (200 * score_sum + total_votes) / (2 * total_votes);
        Self {
            hundredths: u32::try_from(hundredths).unwrap_or(u32::MAX),
        }
    }

    /// Value in hundredths of a point (6.67 is 667).
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.hundredths
    }

    /// Value as a float, for serialization.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }
}

impl fmt::Display for AverageScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for AverageScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

/// A performance together with its derived vote aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPerformance {
    #[serde(flatten)]
    pub performance: performance::Model,
    pub total_votes: u64,
    pub average_score: AverageScore,
}

impl ScoredPerformance {
    /// Attach aggregates from a tally, or the zero default when absent.
    #[must_use]
    pub fn new(performance: performance::Model, tally: Option<&VoteTally>) -> Self {
        let (total_votes, average_score) = tally.map_or((0, AverageScore::ZERO), |t| {
            (
                u64::try_from(t.total_votes).unwrap_or(0),
                AverageScore::from_totals(t.score_sum, t.total_votes),
            )
        });

        Self {
            performance,
            total_votes,
            average_score,
        }
    }
}

/// Leaderboard ordering.
///
/// Higher average first; ties go to more votes, then the earlier
/// submission, then the smaller ID, so no two distinct rows compare equal.
#[must_use]
pub fn leaderboard_order(a: &ScoredPerformance, b: &ScoredPerformance) -> Ordering {
    b.average_score
        .cmp(&a.average_score)
        .then_with(|| b.total_votes.cmp(&a.total_votes))
        .then_with(|| a.performance.created_at.cmp(&b.performance.created_at))
        .then_with(|| a.performance.id.cmp(&b.performance.id))
}

/// Sort into leaderboard order and keep at most `limit` entries.
#[must_use]
pub fn rank(mut entries: Vec<ScoredPerformance>, limit: Option<u64>) -> Vec<ScoredPerformance> {
    entries.sort_by(leaderboard_order);
    if let Some(limit) = limit {
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
    }
    entries
}
