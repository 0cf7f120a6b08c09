// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

pub const PROBES_TOTAL: &str = "sitewatch_probes_total";
pub const PROBE_FAILURES_TOTAL: &str = "sitewatch_probe_failures_total";
pub const CLAIM_ERRORS_TOTAL: &str = "sitewatch_claim_errors_total";
pub const FLUSHES_TOTAL: &str = "sitewatch_flushes_total";
pub const FLUSH_FAILURES_TOTAL: &str = "sitewatch_flush_failures_total";
pub const RECORDS_EXPORTED_TOTAL: &str = "sitewatch_records_exported_total";
pub const RECORDS_DROPPED_TOTAL: &str = "sitewatch_records_dropped_total";

/// 安装Prometheus指标导出器
///
/// 未配置监听地址时只注册指标描述，计数器调用成为空操作。
pub fn init_metrics(listen_addr: Option<SocketAddr>) {
    if let Some(addr) = listen_addr {
        // Ignore error if address is already in use (for development/testing)
        match PrometheusBuilder::new().with_http_listener(addr).install() {
            Ok(()) => info!("Metrics exporter listening on {}", addr),
            Err(e) => warn!(
                "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
                e
            ),
        }
    }

    describe_counter!(PROBES_TOTAL, Unit::Count, "Probes performed by the worker pool");
    describe_counter!(PROBE_FAILURES_TOTAL, Unit::Count, "Probes that produced a failure record");
    describe_counter!(CLAIM_ERRORS_TOTAL, Unit::Count, "Task claims that hit a storage error");
    describe_counter!(FLUSHES_TOTAL, Unit::Count, "Successful batch flushes");
    describe_counter!(FLUSH_FAILURES_TOTAL, Unit::Count, "Batch flushes dropped after a storage error");
    describe_counter!(RECORDS_EXPORTED_TOTAL, Unit::Count, "Probe results written to storage");
    describe_counter!(RECORDS_DROPPED_TOTAL, Unit::Count, "Probe results lost with a failed flush");
}
