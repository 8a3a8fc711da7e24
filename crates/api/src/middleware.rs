//! Shared application state.

use std::sync::Arc;

use molts_core::{CompetitionService, LeaderboardService, PerformanceService, VoteService};
use molts_db::repositories::{CompetitionRepository, PerformanceRepository, VoteRepository};
use sea_orm::DatabaseConnection;

use crate::identity::{ForwardedHeaderResolver, VoterIdentityResolver};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Submission and single-performance reads
    pub performance_service: PerformanceService,
    /// Vote intake
    pub vote_service: VoteService,
    /// Ranked listings
    pub leaderboard_service: LeaderboardService,
    /// Competition listings
    pub competition_service: CompetitionService,
    /// Voter identity for incoming votes
    pub identity_resolver: Arc<dyn VoterIdentityResolver>,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    ///
    /// Voter identity defaults to [`ForwardedHeaderResolver`].
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let performance_repo = PerformanceRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(Arc::clone(&db));
        let competition_repo = CompetitionRepository::new(db);

        Self {
            performance_service: PerformanceService::new(
                performance_repo.clone(),
                vote_repo.clone(),
            ),
            vote_service: VoteService::new(vote_repo.clone(), performance_repo.clone()),
            leaderboard_service: LeaderboardService::new(performance_repo, vote_repo),
            competition_service: CompetitionService::new(competition_repo),
            identity_resolver: Arc::new(ForwardedHeaderResolver),
        }
    }

    /// Replace the voter identity resolver.
    #[must_use]
    pub fn with_identity_resolver(mut self, resolver: Arc<dyn VoterIdentityResolver>) -> Self {
        self.identity_resolver = resolver;
        self
    }
}
