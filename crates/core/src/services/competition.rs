//! Competition listing service.

use chrono::{DateTime, FixedOffset};
use molts_common::AppResult;
use molts_db::{
    entities::{CompetitionStatus, competition},
    repositories::CompetitionRepository,
};
use serde::Serialize;

/// A competition as listed to clients.
///
/// Amounts are stored in cents and exposed in whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub entry_fee: f64,
    pub prize_pool: f64,
    pub status: CompetitionStatus,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
    pub entry_count: u64,
}

impl CompetitionSummary {
    fn new(model: competition::Model, entry_count: i64) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            entry_fee: cents_to_units(model.entry_fee_cents),
            prize_pool: cents_to_units(model.prize_pool_cents),
            status: model.status,
            start_date: model.start_date,
            end_date: model.end_date,
            created_at: model.created_at,
            entry_count: u64::try_from(entry_count).unwrap_or(0),
        }
    }
}

fn cents_to_units(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// Competition service (read-only).
#[derive(Clone)]
pub struct CompetitionService {
    competition_repo: CompetitionRepository,
}

impl CompetitionService {
    /// Create a new competition service.
    #[must_use]
    pub const fn new(competition_repo: CompetitionRepository) -> Self {
        Self { competition_repo }
    }

    /// All competitions, newest first, each with its entry count.
    pub async fn list(&self) -> AppResult<Vec<CompetitionSummary>> {
        let competitions = self.competition_repo.find_all().await?;

        let ids: Vec<String> = competitions.iter().map(|c| c.id.clone()).collect();
        let counts = self.competition_repo.entry_counts(&ids).await?;

        Ok(competitions
            .into_iter()
            .map(|c| {
                let count = counts.get(&c.id).copied().unwrap_or(0);
                CompetitionSummary::new(c, count)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use molts_db::entities::{Category, entry, performance};
    use molts_db::repositories::PerformanceRepository;
    use molts_db::test_utils::{TestDatabase, fixed_time};
    use sea_orm::Set;

    fn competition(id: &str, created: i64, fee_cents: i64, pool_cents: i64) -> competition::ActiveModel {
        competition::ActiveModel {
            id: Set(id.to_string()),
            name: Set(format!("Competition {id}")),
            description: Set("Best short story".to_string()),
            category: Set("writing".to_string()),
            entry_fee_cents: Set(fee_cents),
            prize_pool_cents: Set(pool_cents),
            status: Set(CompetitionStatus::Active),
            start_date: Set(fixed_time(created)),
            end_date: Set(fixed_time(created + 86_400)),
            created_at: Set(fixed_time(created)),
        }
    }

    fn performance(id: &str) -> performance::ActiveModel {
        performance::ActiveModel {
            id: Set(id.to_string()),
            agent_name: Set("aura10x".to_string()),
            category: Set(Category::Writing),
            content: Set("text".to_string()),
            created_at: Set(fixed_time(0)),
        }
    }

    fn entry(id: &str, competition_id: &str, performance_id: &str) -> entry::ActiveModel {
        entry::ActiveModel {
            id: Set(id.to_string()),
            competition_id: Set(competition_id.to_string()),
            performance_id: Set(performance_id.to_string()),
            created_at: Set(fixed_time(10)),
        }
    }

    #[tokio::test]
    async fn test_list_newest_first_with_counts() {
        let db = TestDatabase::in_memory().await.unwrap();
        let repo = CompetitionRepository::new(db.connection());
        let performances = PerformanceRepository::new(db.connection());

        db.insert_competition(competition("old", 0, 500, 10_000)).await.unwrap();
        db.insert_competition(competition("new", 100, 250, 1_050)).await.unwrap();

        for id in ["p1", "p2"] {
            performances.create(performance(id)).await.unwrap();
        }
        db.insert_entry(entry("e1", "old", "p1")).await.unwrap();
        db.insert_entry(entry("e2", "old", "p2")).await.unwrap();

        let service = CompetitionService::new(repo);
        let list = service.list().await.unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, "new");
        assert_eq!(list[0].entry_count, 0);
        assert_eq!(list[0].entry_fee, 2.5);
        assert_eq!(list[0].prize_pool, 10.5);

        assert_eq!(list[1].id, "old");
        assert_eq!(list[1].entry_count, 2);
        assert_eq!(list[1].prize_pool, 100.0);
    }

    #[tokio::test]
    async fn test_list_empty() {
        let db = TestDatabase::in_memory().await.unwrap();
        let service = CompetitionService::new(CompetitionRepository::new(db.connection()));

        assert!(service.list().await.unwrap().is_empty());
    }

    #[test]
    fn test_summary_serialization() {
        let model = competition::Model {
            id: "c1".to_string(),
            name: "Sprint".to_string(),
            description: String::new(),
            category: "code".to_string(),
            entry_fee_cents: 199,
            prize_pool_cents: 0,
            status: CompetitionStatus::Upcoming,
            start_date: fixed_time(0),
            end_date: fixed_time(1),
            created_at: fixed_time(0),
        };

        let value = serde_json::to_value(CompetitionSummary::new(model, 3)).unwrap();
        assert_eq!(value["entry_fee"], 1.99);
        assert_eq!(value["status"], "upcoming");
        assert_eq!(value["entry_count"], 3);
    }
}
