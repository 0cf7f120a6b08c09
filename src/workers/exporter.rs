// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::ProbeResult;
use crate::domain::repositories::metrics_repository::MetricsRepository;
use crate::infrastructure::metrics::{
    FLUSHES_TOTAL, FLUSH_FAILURES_TOTAL, RECORDS_DROPPED_TOTAL, RECORDS_EXPORTED_TOTAL,
};
use crate::queue::result_channel::{Recv, ResultChannel};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// 批处理策略
///
/// 累积探测结果，在数量达到 `batch_size` 或距上次刷新超过
/// `batch_interval` 时报告可以刷新。阈值为 0 表示关闭对应触发条件。
#[derive(Debug)]
pub struct BatchingStrategy {
    batch_size: usize,
    batch_interval: Duration,
    current_batch: Vec<ProbeResult>,
    last_flush: Instant,
}

impl BatchingStrategy {
    pub fn new(batch_size: usize, batch_interval: Duration) -> Self {
        Self {
            batch_size,
            batch_interval,
            current_batch: Vec::new(),
            last_flush: Instant::now(),
        }
    }

    /// 添加一条结果，返回是否应当刷新
    pub fn add(&mut self, result: ProbeResult) -> bool {
        self.current_batch.push(result);
        self.is_ready()
    }

    pub fn is_ready(&self) -> bool {
        self.size_reached() || self.interval_elapsed()
    }

    fn size_reached(&self) -> bool {
        self.batch_size > 0 && self.current_batch.len() >= self.batch_size
    }

    fn interval_elapsed(&self) -> bool {
        !self.batch_interval.is_zero() && self.last_flush.elapsed() >= self.batch_interval
    }

    /// 取走当前批次并重置刷新时间
    pub fn take_batch(&mut self) -> Vec<ProbeResult> {
        self.last_flush = Instant::now();
        std::mem::take(&mut self.current_batch)
    }

    pub fn len(&self) -> usize {
        self.current_batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_batch.is_empty()
    }
}

/// 导出器配置
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// 0 关闭按数量刷新
    pub batch_size: usize,
    /// 0 关闭按时间刷新
    pub batch_interval: Duration,
    /// 每次从通道取数据的最长等待
    pub poll_timeout: Duration,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            batch_interval: Duration::from_secs(60),
            poll_timeout: Duration::from_secs(1),
        }
    }
}

/// 结果导出器
///
/// 结果通道的唯一消费者。累积的批次只由导出器自身持有。
/// 通道关闭且取空，或停止令牌被取消后退出循环，
/// 并对剩余结果执行最后一次刷新。
pub struct ResultsExporter {
    channel: ResultChannel,
    repository: Arc<dyn MetricsRepository>,
    strategy: BatchingStrategy,
    poll_timeout: Duration,
    shutdown: CancellationToken,
}

impl ResultsExporter {
    /// 创建导出器
    ///
    /// `shutdown` 是显式停止入口：取消后在下一次循环检查时退出并做最后一次刷新，
    /// 通道中尚未取出的结果不再处理。正常关闭依靠关闭通道，不取消该令牌。
    pub fn new(
        channel: ResultChannel,
        repository: Arc<dyn MetricsRepository>,
        config: ExporterConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            channel,
            repository,
            strategy: BatchingStrategy::new(config.batch_size, config.batch_interval),
            poll_timeout: config.poll_timeout,
            shutdown,
        }
    }

    /// 运行导出器
    pub async fn run(mut self) {
        info!("Results exporter started");

        while !self.shutdown.is_cancelled() {
            match self.channel.get(self.poll_timeout).await {
                Recv::Item(result) => {
                    if self.strategy.add(result) {
                        self.flush().await;
                    }
                }
                Recv::Empty => {
                    // Lets the interval trigger fire while no results are arriving.
                    if !self.strategy.is_empty() && self.strategy.is_ready() {
                        self.flush().await;
                    }
                }
                Recv::Closed => {
                    info!("Result channel closed and drained");
                    break;
                }
            }
        }

        self.flush().await;
        info!("Results exporter stopped");
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 刷新当前批次
    ///
    /// 写入失败时记录错误并丢弃该批次，不重试。
    async fn flush(&mut self) {
        let batch = self.strategy.take_batch();
        let count = batch.len();
        debug!("Going to export {} records", count);

        match self.repository.insert_result_batch(batch).await {
            Ok(()) => {
                counter!(FLUSHES_TOTAL).increment(1);
                counter!(RECORDS_EXPORTED_TOTAL).increment(count as u64);
            }
            Err(e) => {
                error!(
                    "An error occurred while exporting results, dropping {} records: {}",
                    count, e
                );
                counter!(FLUSH_FAILURES_TOTAL).increment(1);
                counter!(RECORDS_DROPPED_TOTAL).increment(count as u64);
            }
        }
    }
}

#[cfg(test)]
#[path = "exporter_test.rs"]
mod tests;
