// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供探测工作器池、结果导出器以及负责两者生命周期的工作管理器
pub mod exporter;
pub mod manager;
pub mod probe_worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use manager::{LifecycleState, ManagerConfig, WorkerManager};
