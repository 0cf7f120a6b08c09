// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::probe_result::ProbeResult;
use crate::utils::errors::PersistenceError;
use async_trait::async_trait;

/// 探测指标仓库特质
#[async_trait]
pub trait MetricsRepository: Send + Sync {
    /// 以单个原子操作写入一批探测结果
    ///
    /// 空批次直接返回成功。写入失败时整批都不会提交。
    async fn insert_result_batch(&self, results: Vec<ProbeResult>) -> Result<(), PersistenceError>;
}
