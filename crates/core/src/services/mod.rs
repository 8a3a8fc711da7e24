//! Business logic services.

#![allow(missing_docs)]

pub mod competition;
pub mod leaderboard;
pub mod performance;
pub mod vote;

pub use competition::{CompetitionService, CompetitionSummary};
pub use leaderboard::{CategoryFilter, LeaderboardQuery, LeaderboardService};
pub use performance::{PerformanceService, SubmitPerformanceInput};
pub use vote::{CastVoteInput, VoteService};
