// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::engines::traits::ProbeEngine;
use crate::infrastructure::metrics::{CLAIM_ERRORS_TOTAL, PROBES_TOTAL, PROBE_FAILURES_TOTAL};
use crate::queue::result_channel::ResultChannel;
use crate::utils::errors::PersistenceError;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 一次循环迭代的结果
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// 领取并探测了一个任务
    Probed,
    /// 没有到期任务
    Idle,
    /// 结果通道已关闭
    ChannelClosed,
}

/// 探测工作者
///
/// 循环领取到期任务、调用探测引擎并把结果放入结果通道，
/// 直到停止令牌被取消。正在进行的探测不会被中断。
pub struct ProbeWorker {
    repository: Arc<dyn ScheduleRepository>,
    engine: Arc<dyn ProbeEngine>,
    channel: ResultChannel,
    idle_interval: Duration,
    worker_id: Uuid,
}

impl ProbeWorker {
    /// 创建新的探测工作器实例
    pub fn new(
        repository: Arc<dyn ScheduleRepository>,
        engine: Arc<dyn ProbeEngine>,
        channel: ResultChannel,
        idle_interval: Duration,
    ) -> Self {
        Self {
            repository,
            engine,
            channel,
            idle_interval,
            worker_id: Uuid::new_v4(),
        }
    }

    /// 运行探测工作器
    #[instrument(name = "probe_worker", skip_all, fields(worker_id = %self.worker_id))]
    pub async fn run(&self, shutdown: CancellationToken) {
        info!("Probe worker started");

        while !shutdown.is_cancelled() {
            match self.process_next_task().await {
                Ok(Step::Probed) => {}
                Ok(Step::Idle) => self.idle(&shutdown).await,
                Ok(Step::ChannelClosed) => {
                    warn!("Result channel closed, probe worker exiting");
                    break;
                }
                Err(e) => {
                    error!("Failed to claim next task: {}", e);
                    counter!(CLAIM_ERRORS_TOTAL).increment(1);
                    self.idle(&shutdown).await;
                }
            }
        }

        info!("Probe worker finished");
    }

    async fn process_next_task(&self) -> Result<Step, PersistenceError> {
        let Some(task) = self.repository.claim_due_task().await? else {
            return Ok(Step::Idle);
        };

        debug!(schedule_id = %task.schedule_id, url = %task.url, "Probing resource");
        let result = self.engine.probe(&task.url, task.pattern.as_deref()).await;

        counter!(PROBES_TOTAL).increment(1);
        if !result.is_success() {
            counter!(PROBE_FAILURES_TOTAL).increment(1);
        }

        match self.channel.put(result) {
            Ok(()) => Ok(Step::Probed),
            Err(_) => Ok(Step::ChannelClosed),
        }
    }

    async fn idle(&self, shutdown: &CancellationToken) {
        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = sleep(self.idle_interval) => {}
        }
    }
}
