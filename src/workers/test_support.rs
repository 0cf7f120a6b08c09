// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! In-memory stand-ins for the storage and probe collaborators.

use crate::domain::models::probe_result::ProbeResult;
use crate::domain::models::resource::{ClaimedTask, ResourceSchedule};
use crate::domain::repositories::metrics_repository::MetricsRepository;
use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::engines::traits::ProbeEngine;
use crate::utils::errors::PersistenceError;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use sea_orm::DbErr;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Hands out each queued task exactly once.
#[derive(Default)]
pub struct QueueScheduleRepository {
    tasks: Mutex<VecDeque<ClaimedTask>>,
    failing_claims: AtomicUsize,
    claim_attempts: AtomicUsize,
}

impl QueueScheduleRepository {
    pub fn with_urls(urls: &[&str]) -> Self {
        let tasks = urls
            .iter()
            .map(|url| ClaimedTask {
                schedule_id: Uuid::new_v4(),
                url: url.to_string(),
                pattern: None,
                interval_seconds: 5,
            })
            .collect();

        Self {
            tasks: Mutex::new(tasks),
            ..Default::default()
        }
    }

    pub fn fail_next_claims(&self, count: usize) {
        self.failing_claims.store(count, Ordering::SeqCst);
    }

    pub fn claim_attempts(&self) -> usize {
        self.claim_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScheduleRepository for QueueScheduleRepository {
    async fn claim_due_task(&self) -> Result<Option<ClaimedTask>, PersistenceError> {
        self.claim_attempts.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failing_claims
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DbErr::Custom("connection refused".to_string()).into());
        }
        Ok(self.tasks.lock().pop_front())
    }

    async fn enroll(
        &self,
        url: &str,
        interval_seconds: i32,
        pattern: Option<&str>,
    ) -> Result<ResourceSchedule, PersistenceError> {
        let schedule = ResourceSchedule {
            id: Uuid::new_v4(),
            url: url.to_string(),
            interval_seconds,
            pattern: pattern.map(str::to_string),
            next_check: Utc::now(),
        };
        self.tasks.lock().push_back(ClaimedTask {
            schedule_id: schedule.id,
            url: schedule.url.clone(),
            pattern: schedule.pattern.clone(),
            interval_seconds,
        });
        Ok(schedule)
    }
}

/// Records every batch it is handed, optionally failing the first few.
#[derive(Default)]
pub struct RecordingMetricsRepository {
    batches: Mutex<Vec<Vec<ProbeResult>>>,
    failing_inserts: AtomicUsize,
}

impl RecordingMetricsRepository {
    pub fn fail_next_inserts(&self, count: usize) {
        self.failing_inserts.store(count, Ordering::SeqCst);
    }

    /// Every insert call, including empty and failed ones.
    pub fn batches(&self) -> Vec<Vec<ProbeResult>> {
        self.batches.lock().clone()
    }

    pub fn non_empty_batches(&self) -> Vec<Vec<ProbeResult>> {
        self.batches()
            .into_iter()
            .filter(|batch| !batch.is_empty())
            .collect()
    }
}

#[async_trait]
impl MetricsRepository for RecordingMetricsRepository {
    async fn insert_result_batch(&self, results: Vec<ProbeResult>) -> Result<(), PersistenceError> {
        let failing = self
            .failing_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        self.batches.lock().push(results);
        if failing {
            return Err(DbErr::Custom("disk full".to_string()).into());
        }
        Ok(())
    }
}

/// Answers every probe with a 200 after an optional delay.
#[derive(Default)]
pub struct FixedEngine {
    pub delay: Duration,
}

#[async_trait]
impl ProbeEngine for FixedEngine {
    async fn probe(&self, url: &str, _pattern: Option<&str>) -> ProbeResult {
        let timestamp = Utc::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        ProbeResult::success(url, timestamp, self.delay, 200, None)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}
