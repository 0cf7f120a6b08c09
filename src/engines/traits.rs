// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::ProbeResult;
use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
///
/// 只在引擎内部使用，对外统一转换为失败的探测结果。
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 匹配模式无法编译
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// 探测引擎特质
///
/// 对一个资源执行一次网络检查。实现必须把所有失败转换为
/// `ProbeOutcome::Failure`，不得把错误抛出边界之外。
#[async_trait]
pub trait ProbeEngine: Send + Sync {
    /// 探测资源，可选地在响应正文中匹配正则模式
    async fn probe(&self, url: &str, pattern: Option<&str>) -> ProbeResult;

    /// 获取引擎名称
    fn name(&self) -> &'static str;
}
