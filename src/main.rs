// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::Parser;
use sitewatch::config::settings::Settings;
use sitewatch::presentation::cli::{self, Cli};
use sitewatch::utils::telemetry;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，解析命令行、加载配置并执行对应命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // 1. Initialize logging
    telemetry::init_telemetry();

    // 2. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 3. Dispatch
    cli::execute(args.subcommand(), &settings).await
}
