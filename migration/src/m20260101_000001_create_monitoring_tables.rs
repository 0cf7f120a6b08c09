// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create resource_schedules table
        manager
            .create_table(
                Table::create()
                    .table(ResourceSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ResourceSchedules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ResourceSchedules::Url).text().not_null())
                    .col(
                        ColumnDef::new(ResourceSchedules::IntervalSeconds)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ResourceSchedules::Pattern).text())
                    .col(
                        ColumnDef::new(ResourceSchedules::NextCheck)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_resource_schedules_next_check")
                    .table(ResourceSchedules::Table)
                    .col(ResourceSchedules::NextCheck)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_resource_schedules_url_interval")
                    .table(ResourceSchedules::Table)
                    .col(ResourceSchedules::Url)
                    .col(ResourceSchedules::IntervalSeconds)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create probe_metrics table, append-only
        manager
            .create_table(
                Table::create()
                    .table(ProbeMetrics::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProbeMetrics::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProbeMetrics::Url).text().not_null())
                    .col(
                        ColumnDef::new(ProbeMetrics::CheckTimestamp)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProbeMetrics::ResponseTime).double())
                    .col(ColumnDef::new(ProbeMetrics::StatusCode).integer())
                    .col(ColumnDef::new(ProbeMetrics::PatternFound).boolean())
                    .col(ColumnDef::new(ProbeMetrics::ErrorMessage).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_probe_metrics_url_check_timestamp")
                    .table(ProbeMetrics::Table)
                    .col(ProbeMetrics::Url)
                    .col(ProbeMetrics::CheckTimestamp)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProbeMetrics::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ResourceSchedules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ResourceSchedules {
    Table,
    Id,
    Url,
    IntervalSeconds,
    Pattern,
    NextCheck,
}

#[derive(DeriveIden)]
enum ProbeMetrics {
    Table,
    Id,
    Url,
    CheckTimestamp,
    ResponseTime,
    StatusCode,
    PatternFound,
    ErrorMessage,
}
