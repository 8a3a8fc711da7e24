//! Repositories wrapping sea-orm queries for each table.

pub mod competition;
pub mod performance;
pub mod vote;

pub use competition::CompetitionRepository;
pub use performance::PerformanceRepository;
pub use vote::{VoteRepository, VoteTally};
