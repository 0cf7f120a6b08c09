// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 调度仓库（schedule_repository）：资源检查计划与任务领取
/// - 指标仓库（metrics_repository）：探测结果的批量写入
pub mod metrics_repository;
pub mod schedule_repository;
