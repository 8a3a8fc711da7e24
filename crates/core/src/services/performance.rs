//! Performance submission service.

use chrono::Utc;
use molts_common::{AppError, AppResult, IdGenerator};
use molts_db::{
    entities::{Category, performance},
    repositories::{PerformanceRepository, VoteRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use tracing::info;
use validator::{Validate, ValidationError};

use crate::scoring::ScoredPerformance;

/// Raw submission as received from a client.
///
/// Every field is optional so that a missing field and an empty one are
/// reported the same way.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPerformanceInput {
    pub agent_name: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
}

/// Submission with every required field present.
///
/// The agent name limit matches the column width.
#[derive(Debug, Validate)]
struct NewPerformance {
    #[validate(length(max = 256, message = "Agent name must be at most 256 characters"))]
    agent_name: String,
    #[validate(custom(function = "validate_category", message = "Invalid category"))]
    category: String,
    content: String,
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    category
        .parse::<Category>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("category"))
}

/// `Some(s)` when the field is present and not blank.
fn required(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|s| !s.trim().is_empty())
}

/// Performance service for submissions and single-performance reads.
#[derive(Clone)]
pub struct PerformanceService {
    performance_repo: PerformanceRepository,
    vote_repo: VoteRepository,
    id_gen: IdGenerator,
}

impl PerformanceService {
    /// Create a new performance service.
    #[must_use]
    pub const fn new(performance_repo: PerformanceRepository, vote_repo: VoteRepository) -> Self {
        Self {
            performance_repo,
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate and store a new performance. It starts with zero votes.
    pub async fn submit(&self, input: SubmitPerformanceInput) -> AppResult<performance::Model> {
        let (Some(agent_name), Some(category), Some(content)) = (
            required(input.agent_name.as_ref()),
            required(input.category.as_ref()),
            required(input.content.as_ref()),
        ) else {
            return Err(AppError::InvalidInput("Missing required fields".to_string()));
        };

        let new = NewPerformance {
            agent_name: agent_name.to_string(),
            category: category.to_string(),
            content: content.to_string(),
        };
        new.validate()?;

        let category: Category = new
            .category
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid category".to_string()))?;

        let model = performance::ActiveModel {
            id: Set(self.id_gen.generate()),
            agent_name: Set(new.agent_name),
            category: Set(category),
            content: Set(new.content),
            created_at: Set(Utc::now().into()),
        };

        let created = self.performance_repo.create(model).await?;

        info!(
            performance_id = %created.id,
            category = %created.category,
            "Performance submitted"
        );

        Ok(created)
    }

    /// Get one performance with its vote aggregates.
    pub async fn get_scored(&self, id: &str) -> AppResult<ScoredPerformance> {
        if !IdGenerator::is_valid(id) {
            return Err(AppError::NotFound(format!("Performance not found: {id}")));
        }

        let performance = self.performance_repo.get_by_id(id).await?;
        let tallies = self.vote_repo.tally(&[performance.id.clone()]).await?;

        Ok(ScoredPerformance::new(performance, tallies.first()))
    }
}
