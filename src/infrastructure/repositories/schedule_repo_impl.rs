// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::{ClaimedTask, ResourceSchedule};
use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::infrastructure::database::entities::resource_schedule as schedule_entity;
use crate::utils::errors::PersistenceError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{
    sea_query::{LockBehavior, LockType},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// 调度仓库实现
///
/// 基于SeaORM实现。领取操作使用 `FOR UPDATE SKIP LOCKED`，
/// 每次调用都在连接池中的独立连接上开启自己的事务。
#[derive(Clone)]
pub struct ScheduleRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScheduleRepositoryImpl {
    /// 创建新的调度仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<schedule_entity::Model> for ResourceSchedule {
    fn from(model: schedule_entity::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            interval_seconds: model.interval_seconds,
            pattern: model.pattern,
            next_check: model.next_check,
        }
    }
}

impl From<schedule_entity::Model> for ClaimedTask {
    fn from(model: schedule_entity::Model) -> Self {
        Self {
            schedule_id: model.id,
            url: model.url,
            pattern: model.pattern,
            interval_seconds: model.interval_seconds,
        }
    }
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    /// 领取一条到期任务
    ///
    /// 只有 PostgreSQL 会跳过被其他事务锁定的行；SQLite 不支持行锁，
    /// 并发领取者会等待写锁或返回 busy 错误，而不是跳过。
    async fn claim_due_task(&self) -> Result<Option<ClaimedTask>, PersistenceError> {
        let now = Utc::now();
        let txn = self.db.begin().await?;

        let due = schedule_entity::Entity::find()
            .filter(schedule_entity::Column::NextCheck.lte(now))
            .order_by_asc(schedule_entity::Column::NextCheck)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        let Some(row) = due else {
            txn.commit().await?;
            return Ok(None);
        };

        let next_check = now + Duration::seconds(i64::from(row.interval_seconds));
        let mut active: schedule_entity::ActiveModel = row.into();
        active.next_check = Set(next_check);

        // Dropping txn on an error path rolls back, so next_check is never partially advanced.
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        debug!(
            schedule_id = %updated.id,
            url = %updated.url,
            next_check = %next_check,
            "Claimed due task"
        );

        Ok(Some(updated.into()))
    }

    async fn enroll(
        &self,
        url: &str,
        interval_seconds: i32,
        pattern: Option<&str>,
    ) -> Result<ResourceSchedule, PersistenceError> {
        let model = schedule_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            url: Set(url.to_string()),
            interval_seconds: Set(interval_seconds),
            pattern: Set(pattern.map(str::to_string)),
            next_check: Set(Utc::now() + Duration::seconds(i64::from(interval_seconds))),
        };

        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }
}
