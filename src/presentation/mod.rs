// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 表示层模块
///
/// 命令行入口：初始化数据库、登记资源和启动监控
pub mod cli;
