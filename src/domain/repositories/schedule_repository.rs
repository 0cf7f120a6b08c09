// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::{ClaimedTask, ResourceSchedule};
use crate::utils::errors::PersistenceError;
use async_trait::async_trait;
use std::sync::Arc;

/// 调度仓库特质
///
/// 持有所有到期检查的计划，并负责在并发工作器之间分发任务。
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// 领取一个到期任务
    ///
    /// 在同一个事务中选中一条 `next_check <= now` 的记录并把它的
    /// `next_check` 推进到 `now + interval_seconds`。并发调用方之间
    /// 不会领取到同一条记录；被其他事务锁住的记录会被跳过而不是等待。
    ///
    /// # 返回值
    ///
    /// * `Ok(Some(ClaimedTask))` - 成功领取的任务
    /// * `Ok(None)` - 当前没有到期任务
    /// * `Err(PersistenceError)` - 存储层失败，调度时间不会被推进
    async fn claim_due_task(&self) -> Result<Option<ClaimedTask>, PersistenceError>;

    /// 登记新的监控资源，首次检查时间为 `now + interval_seconds`
    async fn enroll(
        &self,
        url: &str,
        interval_seconds: i32,
        pattern: Option<&str>,
    ) -> Result<ResourceSchedule, PersistenceError>;
}

#[async_trait]
impl<T: ScheduleRepository + ?Sized> ScheduleRepository for Arc<T> {
    async fn claim_due_task(&self) -> Result<Option<ClaimedTask>, PersistenceError> {
        (**self).claim_due_task().await
    }

    async fn enroll(
        &self,
        url: &str,
        interval_seconds: i32,
        pattern: Option<&str>,
    ) -> Result<ResourceSchedule, PersistenceError> {
        (**self).enroll(url, interval_seconds, pattern).await
    }
}
