// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::ProbeResult;
use crate::engines::traits::{EngineError, ProbeEngine};
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; sitewatch/1.0)";

/// 探测引擎
///
/// 基于reqwest实现的HTTP探测引擎，所有探测共享同一个客户端连接池。
pub struct ReqwestEngine {
    client: reqwest::Client,
}

/// HTTP探测的原始观测值
struct Observation {
    status_code: u16,
    response_time: Duration,
    pattern_found: Option<bool>,
}

impl ReqwestEngine {
    /// 创建新的探测引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求的总超时时间
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    async fn observe(&self, url: &str, pattern: Option<&str>) -> Result<Observation, EngineError> {
        let matcher = pattern.map(compile_anchored).transpose()?;

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        // Measured up to the response head; reading the body is not part of the response time.
        let response_time = start.elapsed();
        let status_code = response.status().as_u16();

        let pattern_found = match matcher {
            Some(regex) => {
                let body = response.text().await?;
                Some(regex.is_match(&body))
            }
            None => None,
        };

        Ok(Observation {
            status_code,
            response_time,
            pattern_found,
        })
    }
}

/// 编译匹配模式，只在正文开头匹配
fn compile_anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

#[async_trait]
impl ProbeEngine for ReqwestEngine {
    async fn probe(&self, url: &str, pattern: Option<&str>) -> ProbeResult {
        debug!("Probing {} with pattern {:?}", url, pattern);
        let timestamp = Utc::now();

        match self.observe(url, pattern).await {
            Ok(observation) => ProbeResult::success(
                url,
                timestamp,
                observation.response_time,
                observation.status_code,
                observation.pattern_found,
            ),
            Err(e) => {
                warn!("Probe of {} failed: {}", url, e);
                ProbeResult::failure(url, timestamp, e.to_string())
            }
        }
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
