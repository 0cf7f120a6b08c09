// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::use_cases::enroll_resource::EnrollResourceUseCase;
use crate::config::settings::Settings;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::infrastructure::database::connection;
use crate::infrastructure::metrics::init_metrics;
use crate::infrastructure::repositories::metrics_repo_impl::MetricsRepositoryImpl;
use crate::infrastructure::repositories::schedule_repo_impl::ScheduleRepositoryImpl;
use crate::workers::exporter::ExporterConfig;
use crate::workers::manager::{ManagerConfig, WorkerManager};
use anyhow::Context;
use clap::{Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sitewatch", version, about = "Periodic web resource monitoring")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create database schema
    InitDb,
    /// Add new resource for monitoring
    InsertResource {
        /// Name of http resource
        url: String,
        /// Monitoring interval in seconds, from 5 till 300
        #[arg(allow_negative_numbers = true)]
        interval: i64,
        /// Regexp pattern to match text on resource
        pattern: Option<String>,
    },
    /// Start monitoring until SIGINT or SIGTERM (default)
    Run,
}

impl Cli {
    pub fn subcommand(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Run)
    }
}

/// 执行命令
pub async fn execute(command: &Command, settings: &Settings) -> anyhow::Result<()> {
    match command {
        Command::InitDb => init_db(settings).await,
        Command::InsertResource {
            url,
            interval,
            pattern,
        } => insert_resource(settings, url, *interval, pattern.as_deref()).await,
        Command::Run => run(settings).await,
    }
}

async fn init_db(settings: &Settings) -> anyhow::Result<()> {
    let db = connection::create_pool(&settings.database)
        .await
        .context("Failed to connect to database")?;

    Migrator::up(&db, None)
        .await
        .context("Failed to initialize database")?;
    db.close().await?;

    println!("Database initialized successfully");
    Ok(())
}

async fn insert_resource(
    settings: &Settings,
    url: &str,
    interval: i64,
    pattern: Option<&str>,
) -> anyhow::Result<()> {
    let db = Arc::new(
        connection::create_pool(&settings.database)
            .await
            .context("Failed to connect to database")?,
    );
    let use_case = EnrollResourceUseCase::new(Arc::new(ScheduleRepositoryImpl::new(db.clone())));

    use_case.execute(url, interval, pattern).await?;

    println!("Resource added to the queue");
    Ok(())
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    init_metrics(settings.metrics.socket_addr()?);

    let db = connection::create_pool(&settings.database)
        .await
        .context("Failed to connect to database")?;
    info!("Database connection established");
    let shared = Arc::new(db.clone());

    let monitor = &settings.monitor;
    let engine = ReqwestEngine::new(monitor.probe_timeout()).context("Failed to build HTTP client")?;

    let mut manager = WorkerManager::new(
        Arc::new(ScheduleRepositoryImpl::new(shared.clone())),
        Arc::new(MetricsRepositoryImpl::new(shared)),
        Arc::new(engine),
        ManagerConfig {
            num_workers: monitor.num_workers,
            idle_interval: monitor.idle_interval(),
            exporter: ExporterConfig {
                batch_size: monitor.batch_size,
                batch_interval: monitor.batch_interval(),
                poll_timeout: monitor.poll_timeout(),
            },
        },
    )
    .with_connection(db);

    manager.start();
    manager.run_until_signal().await;
    Ok(())
}
