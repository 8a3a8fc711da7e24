//! Core business logic for molts-got-talent.
//!
//! - [`scoring`]: fixed-point averages and the leaderboard ordering
//! - [`services`]: submission intake, vote intake, leaderboard and competition queries

pub mod identity;
pub mod scoring;
pub mod services;

pub use identity::VoterId;
pub use scoring::{AverageScore, Score, ScoredPerformance};
pub use services::*;
