// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use sitewatch::config::settings::DatabaseSettings;
use sitewatch::infrastructure::database::connection;
use sitewatch::infrastructure::database::entities::resource_schedule as schedule_entity;
use std::sync::Arc;
use uuid::Uuid;

/// 创建迁移完成的内存数据库
///
/// 内存 SQLite 每个连接都是独立的数据库，因此连接池固定为单连接。
pub async fn create_test_db() -> Arc<DatabaseConnection> {
    let settings = DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: Some(1),
        min_connections: Some(1),
        connect_timeout: Some(10),
        idle_timeout: None,
    };

    let db = connection::create_pool(&settings)
        .await
        .expect("Failed to open sqlite database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    Arc::new(db)
}

/// 直接插入一条调度记录，`offset_seconds` 为负表示已经到期
pub async fn insert_schedule(
    db: &DatabaseConnection,
    url: &str,
    interval_seconds: i32,
    pattern: Option<&str>,
    offset_seconds: i64,
) -> schedule_entity::Model {
    schedule_entity::ActiveModel {
        id: Set(Uuid::new_v4()),
        url: Set(url.to_string()),
        interval_seconds: Set(interval_seconds),
        pattern: Set(pattern.map(str::to_string)),
        next_check: Set(Utc::now() + Duration::seconds(offset_seconds)),
    }
    .insert(db)
    .await
    .expect("Failed to insert schedule")
}
