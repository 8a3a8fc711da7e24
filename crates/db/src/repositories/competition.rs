//! Competition repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Competition, Entry, competition, entry};
use molts_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Competition repository for database operations.
#[derive(Clone)]
pub struct CompetitionRepository {
    db: Arc<DatabaseConnection>,
}

impl CompetitionRepository {
    /// Create a new competition repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List all competitions, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<competition::Model>> {
        Competition::find()
            .order_by_desc(competition::Column::CreatedAt)
            .order_by_desc(competition::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch competitions", e))
    }

    /// Number of entries per competition for the given IDs.
    ///
    /// Competitions without entries are absent from the map.
    pub async fn entry_counts(&self, competition_ids: &[String]) -> AppResult<HashMap<String, i64>> {
        if competition_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(String, i64)> = Entry::find()
            .select_only()
            .column(entry::Column::CompetitionId)
            .column_as(Expr::col(entry::Column::Id).count(), "entry_count")
            .filter(entry::Column::CompetitionId.is_in(competition_ids.iter().cloned()))
            .group_by(entry::Column::CompetitionId)
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch competitions", e))?;

        Ok(rows.into_iter().collect())
    }
}
