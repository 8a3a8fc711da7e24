//! Vote intake service.

use chrono::Utc;
use molts_common::{AppError, AppResult, IdGenerator};
use molts_db::{
    entities::vote,
    repositories::{PerformanceRepository, VoteRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::identity::VoterId;
use crate::scoring::Score;

/// Raw vote as received from a client.
///
/// `score` stays an untyped JSON value so that a wrong type is reported as
/// a score error instead of a body parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteInput {
    pub performance_id: Option<String>,
    pub score: Option<Value>,
}

/// Vote service enforcing one vote per voter per performance.
#[derive(Clone)]
pub struct VoteService {
    vote_repo: VoteRepository,
    performance_repo: PerformanceRepository,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(vote_repo: VoteRepository, performance_repo: PerformanceRepository) -> Self {
        Self {
            vote_repo,
            performance_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record `voter`'s score for a performance.
    ///
    /// Checks run in order: required fields, score range, performance
    /// existence. The write itself is a single conditional insert on the
    /// (`performance_id`, `voter_id`) pair; losing that race, or voting
    /// twice, yields [`AppError::DuplicateVote`].
    pub async fn cast_vote(&self, voter: &VoterId, input: CastVoteInput) -> AppResult<vote::Model> {
        let performance_id = input
            .performance_id
            .filter(|id| !id.trim().is_empty());
        let score = input.score.filter(|s| !s.is_null());

        let (Some(performance_id), Some(score)) = (performance_id, score) else {
            return Err(AppError::InvalidInput("Missing required fields".to_string()));
        };

        let score = Score::from_json(&score)?;

        if !IdGenerator::is_valid(&performance_id) {
            return Err(AppError::NotFound(format!(
                "Performance not found: {performance_id}"
            )));
        }
        self.performance_repo.get_by_id(&performance_id).await?;

        let vote = vote::Model {
            id: self.id_gen.generate(),
            performance_id,
            voter_id: voter.as_str().to_string(),
            score: score.get(),
            created_at: Utc::now().into(),
        };

        let model = vote::ActiveModel {
            id: Set(vote.id.clone()),
            performance_id: Set(vote.performance_id.clone()),
            voter_id: Set(vote.voter_id.clone()),
            score: Set(vote.score),
            created_at: Set(vote.created_at),
        };

        if !self.vote_repo.insert_if_absent(model).await? {
            debug!(
                performance_id = %vote.performance_id,
                voter_id = %voter,
                "Duplicate vote rejected"
            );
            return Err(AppError::DuplicateVote);
        }

        info!(
            vote_id = %vote.id,
            performance_id = %vote.performance_id,
            score = vote.score,
            "Vote recorded"
        );

        Ok(vote)
    }
}
