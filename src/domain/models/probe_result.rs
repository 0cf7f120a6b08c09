// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// 单次探测的结果
///
/// 由探测引擎生成，经结果通道按值传递给导出器，创建后不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// 被探测的URL
    pub url: String,
    /// 探测开始时间（UTC）
    pub timestamp: DateTime<Utc>,
    /// 探测结果
    pub outcome: ProbeOutcome,
}

/// 探测结果变体
///
/// 成功与失败两种情况互斥，字段不会混用。
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// 收到了HTTP响应
    Success {
        /// 响应时间（秒）
        response_time: f64,
        /// HTTP状态码
        status_code: u16,
        /// 未配置匹配模式时为 None
        pattern_found: Option<bool>,
    },
    /// 探测失败
    Failure {
        /// 失败描述
        error_message: String,
    },
}

impl ProbeResult {
    pub fn success(
        url: impl Into<String>,
        timestamp: DateTime<Utc>,
        response_time: Duration,
        status_code: u16,
        pattern_found: Option<bool>,
    ) -> Self {
        Self {
            url: url.into(),
            timestamp,
            outcome: ProbeOutcome::Success {
                response_time: response_time.as_secs_f64(),
                status_code,
                pattern_found,
            },
        }
    }

    pub fn failure(
        url: impl Into<String>,
        timestamp: DateTime<Utc>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            timestamp,
            outcome: ProbeOutcome::Failure {
                error_message: error_message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }
}
