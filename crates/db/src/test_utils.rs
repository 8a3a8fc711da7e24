//! Test utilities for database operations.
//!
//! Provides an in-memory SQLite database with the real migrations applied.
//! Requires the `sqlx-sqlite` sea-orm feature, enabled by this crate's
//! `test-utils` feature and by its dev-dependencies.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::entities::{Competition, Entry, Performance, Vote, competition, entry};
use crate::migrations::Migrator;

/// URL of a private in-memory SQLite database.
pub const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// A migrated test database.
pub struct TestDatabase {
    /// Shared database connection.
    pub conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create a fresh in-memory database and run all migrations.
    ///
    /// The pool is pinned to one connection: each SQLite in-memory
    /// connection would otherwise see its own empty database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new(SQLITE_MEMORY_URL);
        opt.max_connections(1).min_connections(1).sqlx_logging(false);

        let conn = Database::connect(opt).await?;
        Migrator::up(&conn, None).await?;

        info!("Created in-memory test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Connect to an existing database URL and run all migrations.
    pub async fn from_url(url: &str) -> Result<Self, DbErr> {
        let conn = Database::connect(url).await?;
        Migrator::up(&conn, None).await?;

        info!("Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
        })
    }

    /// Get the database connection.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Seed a competition. Competitions are read-only through the API.
    pub async fn insert_competition(
        &self,
        model: competition::ActiveModel,
    ) -> Result<competition::Model, DbErr> {
        model.insert(self.conn.as_ref()).await
    }

    /// Seed an entry linking a performance to a competition.
    pub async fn insert_entry(&self, model: entry::ActiveModel) -> Result<entry::Model, DbErr> {
        model.insert(self.conn.as_ref()).await
    }

    /// Delete all rows, children before parents.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        let db = self.conn.as_ref();
        Entry::delete_many().exec(db).await?;
        Vote::delete_many().exec(db).await?;
        Competition::delete_many().exec(db).await?;
        Performance::delete_many().exec(db).await?;

        info!("Cleaned up test database");
        Ok(())
    }
}

/// Timestamp `offset_secs` seconds after a fixed reference instant.
///
/// Gives fixtures a stable, strictly ordered `created_at`.
#[must_use]
pub fn fixed_time(offset_secs: i64) -> DateTime<FixedOffset> {
    let base = DateTime::parse_from_rfc3339("2025-01-01T00:00:00+00:00")
        .map_or_else(|_| Utc::now().fixed_offset(), |t| t);
    base + chrono::Duration::seconds(offset_secs)
}
