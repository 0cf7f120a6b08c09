// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 最小检查间隔（秒）
pub const MIN_INTERVAL_SECONDS: i64 = 5;
/// 最大检查间隔（秒）
pub const MAX_INTERVAL_SECONDS: i64 = 300;

/// 资源调度条目
///
/// 每个 (url, interval_seconds) 组合对应一条记录。同一个URL可以按
/// 不同的间隔被多次调度，但同一间隔下不会重复。
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchedule {
    /// 调度条目ID
    pub id: Uuid,
    /// 目标URL
    pub url: String,
    /// 检查间隔（秒），取值范围 5..=300
    pub interval_seconds: i32,
    /// 可选的正则匹配模式
    pub pattern: Option<String>,
    /// 下一次检查时间
    pub next_check: DateTime<Utc>,
}

/// 已领取的任务
///
/// 领取成功时返回的调度条目投影，不单独持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimedTask {
    pub schedule_id: Uuid,
    pub url: String,
    pub pattern: Option<String>,
    pub interval_seconds: i32,
}

/// 校验检查间隔是否在允许范围内
pub fn validate_interval(interval_seconds: i64) -> bool {
    (MIN_INTERVAL_SECONDS..=MAX_INTERVAL_SECONDS).contains(&interval_seconds)
}
