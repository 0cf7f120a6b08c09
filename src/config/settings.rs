// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、监控引擎和指标导出等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 监控引擎配置
    pub monitor: MonitorSettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 监控引擎配置设置
#[derive(Debug, Deserialize)]
pub struct MonitorSettings {
    /// 工作器数量
    pub num_workers: usize,
    /// 达到该数量即刷新批次，0 表示关闭
    pub batch_size: usize,
    /// 距上次刷新超过该秒数即刷新批次，0 表示关闭
    pub batch_interval_secs: u64,
    /// 没有到期任务时的空闲等待（毫秒）
    pub idle_interval_ms: u64,
    /// 单次HTTP探测超时（秒）
    pub probe_timeout_secs: u64,
    /// 导出器从结果通道取数据的等待时间（毫秒）
    pub poll_timeout_ms: u64,
}

/// 指标导出配置设置
#[derive(Debug, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 监听地址，未设置时不启动导出器
    pub listen_addr: Option<String>,
}

impl MonitorSettings {
    pub fn batch_interval(&self) -> Duration {
        Duration::from_secs(self.batch_interval_secs)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}

impl MetricsSettings {
    /// 解析指标监听地址
    pub fn socket_addr(&self) -> Result<Option<SocketAddr>, ConfigError> {
        self.listen_addr
            .as_deref()
            .map(|addr| {
                addr.parse().map_err(|e| {
                    ConfigError::Message(format!("Invalid metrics.listen_addr '{}': {}", addr, e))
                })
            })
            .transpose()
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `SITEWATCH__` 前缀的环境变量，例如 `SITEWATCH__DATABASE__URL`。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并通过校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SITEWATCH").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn with_defaults(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        builder
            // Default DB pool settings
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default monitor settings
            .set_default("monitor.num_workers", 10)?
            .set_default("monitor.batch_size", 100)?
            .set_default("monitor.batch_interval_secs", 60)?
            .set_default("monitor.idle_interval_ms", 1000)?
            .set_default("monitor.probe_timeout_secs", 30)?
            .set_default("monitor.poll_timeout_ms", 1000)
    }

    /// 校验配置之间的约束
    ///
    /// 每个工作器的领取事务需要独立的连接，导出器另外需要一个。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.num_workers == 0 {
            return Err(ConfigError::Message(
                "monitor.num_workers must be at least 1".to_string(),
            ));
        }

        if let Some(max) = self.database.max_connections {
            let required = self.monitor.num_workers + 1;
            if (max as usize) < required {
                return Err(ConfigError::Message(format!(
                    "database.max_connections ({}) must be at least monitor.num_workers + 1 ({})",
                    max, required
                )));
            }
        }

        self.metrics.socket_addr()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
