// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_db, insert_schedule};
use sea_orm::EntityTrait;
use sitewatch::engines::reqwest_engine::ReqwestEngine;
use sitewatch::infrastructure::database::entities::probe_metric as metric_entity;
use sitewatch::infrastructure::repositories::metrics_repo_impl::MetricsRepositoryImpl;
use sitewatch::infrastructure::repositories::schedule_repo_impl::ScheduleRepositoryImpl;
use sitewatch::workers::exporter::ExporterConfig;
use sitewatch::workers::{LifecycleState, ManagerConfig, WorkerManager};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 端到端：到期调度被探测，结果在关闭前全部写入指标表
#[tokio::test]
async fn test_due_schedules_are_probed_and_persisted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthy"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Status: OK"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal error"))
        .mount(&server)
        .await;

    let db = create_test_db().await;
    let healthy = format!("{}/healthy", server.uri());
    let broken = format!("{}/broken", server.uri());
    insert_schedule(&db, &healthy, 60, Some("Status"), -5).await;
    insert_schedule(&db, &broken, 60, Some("Status"), -5).await;
    // Port 9 (discard) is closed on test hosts, so this probe fails to connect.
    insert_schedule(&db, "http://127.0.0.1:9/", 60, None, -5).await;
    insert_schedule(&db, &healthy, 120, None, 300).await;

    let engine = ReqwestEngine::new(Duration::from_secs(5)).unwrap();
    let config = ManagerConfig {
        num_workers: 2,
        idle_interval: Duration::from_millis(50),
        exporter: ExporterConfig {
            batch_size: 100,
            batch_interval: Duration::from_secs(60),
            poll_timeout: Duration::from_millis(50),
        },
    };
    let mut manager = WorkerManager::new(
        Arc::new(ScheduleRepositoryImpl::new(db.clone())),
        Arc::new(MetricsRepositoryImpl::new(db.clone())),
        Arc::new(engine),
        config,
    );

    manager.start();
    assert_eq!(manager.state(), LifecycleState::Running);

    // Long enough for three claims and probes, far short of the 60s interval and batch trigger.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    manager.shutdown().await;
    assert_eq!(manager.state(), LifecycleState::Stopped);

    let rows = metric_entity::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(rows.len(), 3);

    let ok = rows.iter().find(|row| row.url == healthy).unwrap();
    assert_eq!(ok.status_code, Some(200));
    assert_eq!(ok.pattern_found, Some(true));
    assert!(ok.response_time.unwrap() >= 0.0);

    let failed_status = rows.iter().find(|row| row.url == broken).unwrap();
    assert_eq!(failed_status.status_code, Some(500));
    assert_eq!(failed_status.pattern_found, Some(false));

    let unreachable = rows
        .iter()
        .find(|row| row.url == "http://127.0.0.1:9/")
        .unwrap();
    assert!(unreachable.status_code.is_none());
    assert!(unreachable.error_message.is_some());
}
