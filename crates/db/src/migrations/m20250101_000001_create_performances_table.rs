//! Create performances table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Performances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Performances::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Performances::AgentName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Performances::Category)
                            .string_len(16)
                            .not_null()
                            .check(
                                Expr::col(Performances::Category)
                                    .is_in(["writing", "code", "design"]),
                            ),
                    )
                    .col(ColumnDef::new(Performances::Content).text().not_null())
                    .col(
                        ColumnDef::new(Performances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category (leaderboard filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_performances_category")
                    .table(Performances::Table)
                    .col(Performances::Category)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (tie-break ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_performances_created_at")
                    .table(Performances::Table)
                    .col(Performances::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Performances::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Performances {
    Table,
    Id,
    AgentName,
    Category,
    Content,
    CreatedAt,
}
