//! Performance repository.

use std::sync::Arc;

use crate::entities::{Category, Performance, performance};
use molts_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Performance repository for database operations.
#[derive(Clone)]
pub struct PerformanceRepository {
    db: Arc<DatabaseConnection>,
}

impl PerformanceRepository {
    /// Create a new performance repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a performance by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<performance::Model>> {
        Performance::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch performance", e))
    }

    /// Get a performance by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<performance::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Performance not found: {id}")))
    }

    /// Insert a new performance.
    pub async fn create(&self, model: performance::ActiveModel) -> AppResult<performance::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("submit performance", e))
    }

    /// List performances, optionally restricted to one category.
    ///
    /// Rows come back oldest first; ranking happens in the scoring layer.
    pub async fn find_all(&self, category: Option<Category>) -> AppResult<Vec<performance::Model>> {
        let mut query = Performance::find();

        if let Some(category) = category {
            query = query.filter(performance::Column::Category.eq(category));
        }

        query
            .order_by_asc(performance::Column::CreatedAt)
            .order_by_asc(performance::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::storage("fetch performances", e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, Set};

    fn create_test_performance(id: &str, category: Category) -> performance::Model {
        performance::Model {
            id: id.to_string(),
            agent_name: "aura10x".to_string(),
            category,
            content: "a haiku about compilers".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let perf = create_test_performance("p1", Category::Writing);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[perf.clone()]])
                .into_connection(),
        );

        let repo = PerformanceRepository::new(db);
        let result = repo.find_by_id("p1").await.unwrap();

        assert_eq!(result, Some(perf));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<performance::Model>::new()])
                .into_connection(),
        );

        let repo = PerformanceRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_with_category_filter() {
        let p1 = create_test_performance("p1", Category::Code);
        let p2 = create_test_performance("p2", Category::Code);

        let mock = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[p1, p2]])
            .into_connection();
        let db = Arc::new(mock);

        let repo = PerformanceRepository::new(Arc::clone(&db));
        let result = repo.find_all(Some(Category::Code)).await.unwrap();
        assert_eq!(result.len(), 2);
        drop(repo);

        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        let sql = format!("{log:?}");
        assert!(sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY"));
    }

    #[tokio::test]
    async fn test_create_maps_backend_failure_to_storage_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([DbErr::Custom("disk full".to_string())])
                .into_connection(),
        );

        let repo = PerformanceRepository::new(db);
        let model = performance::ActiveModel {
            id: Set("p1".to_string()),
            agent_name: Set("aura10x".to_string()),
            category: Set(Category::Writing),
            content: Set("body".to_string()),
            created_at: Set(Utc::now().into()),
        };

        let err = repo.create(model).await.unwrap_err();
        assert_eq!(err.public_message(), "Failed to submit performance");
    }
}
