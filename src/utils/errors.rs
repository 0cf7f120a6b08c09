// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;

/// 持久化错误类型
///
/// 存储层的任何失败都会以该错误返回给直接调用方，
/// 由调用方决定记录日志、重试还是丢弃。
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}
