//! Leaderboard service.

use std::collections::HashMap;

use molts_common::AppResult;
use molts_db::{
    entities::Category,
    repositories::{PerformanceRepository, VoteRepository},
};
use serde::Deserialize;
use tracing::debug;

use crate::scoring::{self, ScoredPerformance};

/// Query parameters for the leaderboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// Category name, or `all`.
    pub category: Option<String>,
    /// Maximum number of entries.
    pub limit: Option<u64>,
}

/// Resolved category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryFilter {
    /// No filter (`category` absent or `all`).
    All,
    /// Only this category.
    Only(Category),
    /// A name that is not a category; nothing matches it.
    Unknown,
}

impl CategoryFilter {
    /// Resolve a raw `category` query parameter.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("all") => Self::All,
            Some(name) => name.parse().map_or(Self::Unknown, Self::Only),
        }
    }
}

/// Leaderboard service computing ranked performances on read.
#[derive(Clone)]
pub struct LeaderboardService {
    performance_repo: PerformanceRepository,
    vote_repo: VoteRepository,
}

impl LeaderboardService {
    /// Create a new leaderboard service.
    #[must_use]
    pub const fn new(performance_repo: PerformanceRepository, vote_repo: VoteRepository) -> Self {
        Self {
            performance_repo,
            vote_repo,
        }
    }

    /// Ranked performances with their aggregates.
    ///
    /// Nothing is cached: two calls with no writes in between return the
    /// same entries in the same order.
    pub async fn leaderboard(&self, query: LeaderboardQuery) -> AppResult<Vec<ScoredPerformance>> {
        let category = match CategoryFilter::parse(query.category.as_deref()) {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
            CategoryFilter::Unknown => {
                debug!(category = ?query.category, "Unknown leaderboard category");
                return Ok(Vec::new());
            }
        };

        if query.limit == Some(0) {
            return Ok(Vec::new());
        }

        let performances = self.performance_repo.find_all(category).await?;
        if performances.is_empty() {
            return Ok(Vec::new());
        }

        let tallies: HashMap<_, _> = self
            .vote_repo
            .tally_by_category(category)
            .await?
            .into_iter()
            .map(|t| (t.performance_id.clone(), t))
            .collect();

        let entries = performances
            .into_iter()
            .map(|p| {
                let tally = tallies.get(&p.id);
                ScoredPerformance::new(p, tally)
            })
            .collect();

        Ok(scoring::rank(entries, query.limit))
    }
}
