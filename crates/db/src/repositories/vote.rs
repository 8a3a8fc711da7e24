//! Vote repository.

use std::sync::Arc;

use crate::entities::{Category, Vote, performance, vote};
use molts_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Select, SqlErr,
    sea_query::{Expr, OnConflict},
};

/// Vote count and score sum for one performance.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct VoteTally {
    pub performance_id: String,
    pub total_votes: i64,
    pub score_sum: i64,
}

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a vote unless one already exists for its
    /// (`performance_id`, `voter_id`) pair.
    ///
    /// This is a single `INSERT ... ON CONFLICT DO NOTHING` statement against
    /// the unique index on the pair, so concurrent callers cannot both
    /// succeed. Returns `false` when the pair was already taken.
    pub async fn insert_if_absent(&self, model: vote::ActiveModel) -> AppResult<bool> {
        let result = Vote::insert(model)
            .on_conflict(
                OnConflict::columns([vote::Column::PerformanceId, vote::Column::VoterId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await;

        match result {
            Ok(rows_affected) => Ok(rows_affected > 0),
            Err(DbErr::RecordNotInserted) => Ok(false),
            // Backends that surface the conflict as an error instead
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(AppError::storage("submit vote", e)),
        }
    }

    /// Vote count and score sum per performance for the given IDs.
    ///
    /// Performances without votes are absent from the result.
    pub async fn tally(&self, performance_ids: &[String]) -> AppResult<Vec<VoteTally>> {
        if performance_ids.is_empty() {
            return Ok(Vec::new());
        }

        Self::tally_query()
            .filter(vote::Column::PerformanceId.is_in(performance_ids.iter().cloned()))
            .into_model::<VoteTally>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch vote totals", e))
    }

    /// Vote count and score sum for every voted performance, optionally
    /// restricted to one category.
    pub async fn tally_by_category(&self, category: Option<Category>) -> AppResult<Vec<VoteTally>> {
        let mut query = Self::tally_query();

        if let Some(category) = category {
            query = query
                .join(JoinType::InnerJoin, vote::Relation::Performance.def())
                .filter(performance::Column::Category.eq(category));
        }

        query
            .into_model::<VoteTally>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch vote totals", e))
    }

    fn tally_query() -> Select<Vote> {
        Vote::find()
            .select_only()
            .column(vote::Column::PerformanceId)
            .column_as(Expr::col((Vote, vote::Column::Id)).count(), "total_votes")
            .column_as(Expr::col((Vote, vote::Column::Score)).sum(), "score_sum")
            .group_by(vote::Column::PerformanceId)
    }

    /// Count votes recorded for a performance.
    pub async fn count_by_performance(&self, performance_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::PerformanceId.eq(performance_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("count votes", e))
    }
}
