// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::{ProbeOutcome, ProbeResult};
use crate::domain::repositories::metrics_repository::MetricsRepository;
use crate::infrastructure::database::entities::probe_metric as metric_entity;
use crate::utils::errors::PersistenceError;
use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, Set, TransactionTrait};
use std::sync::Arc;
use uuid::Uuid;

/// 单条 INSERT 语句包含的最大行数
///
/// 每行绑定7个参数，PostgreSQL 单条语句最多 65535 个绑定参数。
const INSERT_CHUNK_SIZE: usize = 1000;

/// 探测指标仓库实现
#[derive(Clone)]
pub struct MetricsRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl MetricsRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<ProbeResult> for metric_entity::ActiveModel {
    fn from(result: ProbeResult) -> Self {
        let (response_time, status_code, pattern_found, error_message) = match result.outcome {
            ProbeOutcome::Success {
                response_time,
                status_code,
                pattern_found,
            } => (
                Some(response_time),
                Some(i32::from(status_code)),
                pattern_found,
                None,
            ),
            ProbeOutcome::Failure { error_message } => (None, None, None, Some(error_message)),
        };

        Self {
            id: Set(Uuid::new_v4()),
            url: Set(result.url),
            check_timestamp: Set(result.timestamp),
            response_time: Set(response_time),
            status_code: Set(status_code),
            pattern_found: Set(pattern_found),
            error_message: Set(error_message),
        }
    }
}

#[async_trait]
impl MetricsRepository for MetricsRepositoryImpl {
    async fn insert_result_batch(&self, results: Vec<ProbeResult>) -> Result<(), PersistenceError> {
        if results.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;

        let mut rows = results
            .into_iter()
            .map(metric_entity::ActiveModel::from)
            .peekable();
        while rows.peek().is_some() {
            let chunk: Vec<_> = rows.by_ref().take(INSERT_CHUNK_SIZE).collect();
            metric_entity::Entity::insert_many(chunk)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(())
    }
}
