// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含资源登记等用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体和仓库接口
pub mod domain;

/// 引擎模块
///
/// 实现HTTP探测引擎
pub mod engines;

/// 基础设施模块
///
/// 提供数据库、仓库实现和指标导出
pub mod infrastructure;

/// 表示层模块
///
/// 命令行接口
pub mod presentation;

/// 队列模块
///
/// 工作器与导出器之间的结果通道
pub mod queue;

/// 工具模块
///
/// 错误类型和遥测初始化
pub mod utils;

/// 工作器模块
///
/// 探测工作器池、批量导出器和生命周期管理
pub mod workers;
