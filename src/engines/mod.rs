// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 探测引擎模块
///
/// 定义探测引擎接口及其基于reqwest的实现
pub mod reqwest_engine;
pub mod traits;
