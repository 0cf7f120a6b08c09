// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 资源调度（resource）：被监控的资源及其检查计划
/// - 探测结果（probe_result）：单次探测的成功或失败记录
pub mod probe_result;
pub mod resource;
