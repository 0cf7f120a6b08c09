// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::metrics_repository::MetricsRepository;
use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::engines::traits::ProbeEngine;
use crate::queue::result_channel::ResultChannel;
use crate::workers::exporter::{ExporterConfig, ResultsExporter};
use crate::workers::probe_worker::ProbeWorker;
use futures::future::join_all;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// 生命周期状态
///
/// 只会按 Created → Running → Stopping → Stopped 单向推进。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Running,
    Stopping,
    Stopped,
}

/// 工作管理器配置
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// 工作器数量
    pub num_workers: usize,
    /// 没有到期任务时的空闲等待
    pub idle_interval: Duration,
    /// 导出器配置
    pub exporter: ExporterConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            num_workers: 10,
            idle_interval: Duration::from_secs(1),
            exporter: ExporterConfig::default(),
        }
    }
}

/// 工作管理器
///
/// 启动探测工作器池和结果导出器，并在收到终止信号时按顺序关闭：
/// 停止工作器并等待其完成正在进行的探测，关闭结果通道，
/// 等待导出器取空通道并完成最后一次刷新，最后释放数据库连接。
pub struct WorkerManager {
    schedule_repository: Arc<dyn ScheduleRepository>,
    metrics_repository: Arc<dyn MetricsRepository>,
    engine: Arc<dyn ProbeEngine>,
    db: Option<DatabaseConnection>,
    config: ManagerConfig,
    channel: ResultChannel,
    state: LifecycleState,
    worker_shutdown: CancellationToken,
    /// 导出器的显式停止令牌
    ///
    /// `shutdown()` 不会取消它，导出器在通道关闭并取空后自行退出，缓冲结果不会丢失。
    exporter_shutdown: CancellationToken,
    worker_handles: Vec<JoinHandle<()>>,
    exporter_handle: Option<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new(
        schedule_repository: Arc<dyn ScheduleRepository>,
        metrics_repository: Arc<dyn MetricsRepository>,
        engine: Arc<dyn ProbeEngine>,
        config: ManagerConfig,
    ) -> Self {
        Self {
            schedule_repository,
            metrics_repository,
            engine,
            db: None,
            config,
            channel: ResultChannel::new(),
            state: LifecycleState::Created,
            worker_shutdown: CancellationToken::new(),
            exporter_shutdown: CancellationToken::new(),
            worker_handles: Vec::new(),
            exporter_handle: None,
        }
    }

    /// 关闭时需要释放的数据库连接池
    pub fn with_connection(mut self, db: DatabaseConnection) -> Self {
        self.db = Some(db);
        self
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// 结果通道句柄
    pub fn channel(&self) -> &ResultChannel {
        &self.channel
    }

    /// 启动工作器池和导出器
    ///
    /// 仅在 Created 状态下生效，重复调用会被忽略。
    pub fn start(&mut self) {
        if self.state != LifecycleState::Created {
            warn!("Worker manager already started (state {:?})", self.state);
            return;
        }

        for _ in 0..self.config.num_workers {
            let worker = ProbeWorker::new(
                self.schedule_repository.clone(),
                self.engine.clone(),
                self.channel.clone(),
                self.config.idle_interval,
            );
            let shutdown = self.worker_shutdown.clone();
            let handle = tokio::spawn(async move {
                worker.run(shutdown).await;
            });
            self.worker_handles.push(handle);
        }

        let exporter = ResultsExporter::new(
            self.channel.clone(),
            self.metrics_repository.clone(),
            self.config.exporter.clone(),
            self.exporter_shutdown.clone(),
        );
        self.exporter_handle = Some(exporter.start());

        self.state = LifecycleState::Running;
        info!(
            "Monitoring started with {} workers using engine {}",
            self.config.num_workers,
            self.engine.name()
        );
    }

    /// 按顺序关闭
    ///
    /// 只有 Running 状态下的第一次调用会执行关闭流程，之后的调用不做任何事。
    pub async fn shutdown(&mut self) {
        if self.state != LifecycleState::Running {
            return;
        }
        self.state = LifecycleState::Stopping;

        info!("Stopping probe workers...");
        self.worker_shutdown.cancel();
        for outcome in join_all(self.worker_handles.drain(..)).await {
            if let Err(e) = outcome {
                error!("Probe worker terminated abnormally: {}", e);
            }
        }
        info!("Probe workers stopped");

        // Only now that no producer is left can the channel be closed without losing results.
        self.channel.close();
        info!("Result channel closed");

        if let Some(handle) = self.exporter_handle.take() {
            if let Err(e) = handle.await {
                error!("Results exporter terminated abnormally: {}", e);
            }
        }
        info!("Results exporter stopped");

        if let Some(db) = self.db.take() {
            match db.close().await {
                Ok(()) => info!("Database connections closed"),
                Err(e) => error!("Failed to close database connections: {}", e),
            }
        }

        self.state = LifecycleState::Stopped;
        info!("Monitoring finished");
    }

    /// 等待终止信号后执行关闭
    pub async fn run_until_signal(&mut self) {
        wait_for_signal().await;
        self.shutdown().await;
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            error!("Unable to listen for SIGTERM: {}", err);
            return wait_for_ctrl_c().await;
        }
    };

    tokio::select! {
        _ = wait_for_ctrl_c() => {}
        _ = terminate.recv() => info!("SIGTERM received"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
