//! Create votes table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Votes::PerformanceId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Votes::VoterId).text().not_null())
                    .col(
                        ColumnDef::new(Votes::Score)
                            .integer()
                            .not_null()
                            .check(Expr::col(Votes::Score).between(1, 10)),
                    )
                    .col(
                        ColumnDef::new(Votes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_votes_performance")
                            .from(Votes::Table, Votes::PerformanceId)
                            .to(Performances::Table, Performances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (performance_id, voter_id) - one vote per identity per
        // performance. Vote inserts use it as their ON CONFLICT target.
        manager
            .create_index(
                Index::create()
                    .name("idx_votes_performance_voter")
                    .table(Votes::Table)
                    .col(Votes::PerformanceId)
                    .col(Votes::VoterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Votes {
    Table,
    Id,
    PerformanceId,
    VoterId,
    Score,
    CreatedAt,
}

#[derive(Iden)]
enum Performances {
    Table,
    Id,
}
