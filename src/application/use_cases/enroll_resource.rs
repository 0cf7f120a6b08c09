// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::resource::{validate_interval, ResourceSchedule};
use crate::domain::repositories::schedule_repository::ScheduleRepository;
use crate::utils::errors::PersistenceError;
use regex::Regex;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

/// 资源登记错误
#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("Interval should be in range between 5 and 300 seconds!")]
    InvalidInterval(i64),

    #[error("Invalid resource URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// 登记监控资源用例
pub struct EnrollResourceUseCase {
    repository: Arc<dyn ScheduleRepository>,
}

impl EnrollResourceUseCase {
    pub fn new(repository: Arc<dyn ScheduleRepository>) -> Self {
        Self { repository }
    }

    /// 校验并登记资源
    ///
    /// # 参数
    ///
    /// * `url` - HTTP(S) 资源地址
    /// * `interval_seconds` - 检查间隔，5 到 300 秒
    /// * `pattern` - 可选的正则匹配模式
    pub async fn execute(
        &self,
        url: &str,
        interval_seconds: i64,
        pattern: Option<&str>,
    ) -> Result<ResourceSchedule, EnrollError> {
        if !validate_interval(interval_seconds) {
            return Err(EnrollError::InvalidInterval(interval_seconds));
        }
        // Bounded by validate_interval above.
        let interval = interval_seconds as i32;

        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(EnrollError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        if let Some(pattern) = pattern {
            Regex::new(pattern)?;
        }

        let schedule = self.repository.enroll(url, interval, pattern).await?;
        info!(
            "Resource {} scheduled every {}s (id {})",
            schedule.url, schedule.interval_seconds, schedule.id
        );
        Ok(schedule)
    }
}
