// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::super::helpers::create_test_db;
use chrono::Utc;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};
use sitewatch::domain::models::probe_result::ProbeResult;
use sitewatch::domain::repositories::metrics_repository::MetricsRepository;
use sitewatch::infrastructure::database::entities::probe_metric as metric_entity;
use sitewatch::infrastructure::repositories::metrics_repo_impl::MetricsRepositoryImpl;
use std::time::Duration;

#[tokio::test]
async fn test_insert_batch_persists_both_outcomes() {
    let db = create_test_db().await;
    let repo = MetricsRepositoryImpl::new(db.clone());
    let now = Utc::now();

    repo.insert_result_batch(vec![
        ProbeResult::success(
            "https://example.com/ok",
            now,
            Duration::from_millis(250),
            200,
            Some(true),
        ),
        ProbeResult::failure("https://example.com/down", now, "connection refused"),
    ])
    .await
    .unwrap();

    let rows = metric_entity::Entity::find().all(db.as_ref()).await.unwrap();
    assert_eq!(rows.len(), 2);

    let ok = rows
        .iter()
        .find(|row| row.url == "https://example.com/ok")
        .unwrap();
    assert_eq!(ok.status_code, Some(200));
    assert_eq!(ok.pattern_found, Some(true));
    assert!((ok.response_time.unwrap() - 0.25).abs() < 1e-9);
    assert!(ok.error_message.is_none());

    let down = rows
        .iter()
        .find(|row| row.url == "https://example.com/down")
        .unwrap();
    assert!(down.status_code.is_none());
    assert!(down.response_time.is_none());
    assert!(down.pattern_found.is_none());
    assert_eq!(down.error_message.as_deref(), Some("connection refused"));
}

#[tokio::test]
async fn test_insert_empty_batch_is_noop() {
    let db = create_test_db().await;
    let repo = MetricsRepositoryImpl::new(db.clone());

    repo.insert_result_batch(Vec::new()).await.unwrap();

    let count = metric_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 0);
}

/// 超过单条语句上限的批次被拆分后全部写入
#[tokio::test]
async fn test_insert_large_batch_spans_chunks() {
    let db = create_test_db().await;
    let repo = MetricsRepositoryImpl::new(db.clone());
    let now = Utc::now();

    let results: Vec<ProbeResult> = (0..2500)
        .map(|i| ProbeResult::failure(format!("https://example.com/{i}"), now, "timeout"))
        .collect();
    repo.insert_result_batch(results).await.unwrap();

    let count = metric_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 2500);
}

/// 批次中任意一行写入失败时，整个批次都不落库
#[tokio::test]
async fn test_failed_batch_commits_nothing() {
    let db = create_test_db().await;
    db.execute_unprepared(
        "CREATE TRIGGER reject_bad_url BEFORE INSERT ON probe_metrics \
         WHEN NEW.url = 'https://example.com/rejected' \
         BEGIN SELECT RAISE(ABORT, 'rejected url'); END;",
    )
    .await
    .unwrap();
    let repo = MetricsRepositoryImpl::new(db.clone());
    let now = Utc::now();

    // The rejected row lands in the second chunk, after the first one is already written.
    let mut results: Vec<ProbeResult> = (0..1500)
        .map(|i| ProbeResult::failure(format!("https://example.com/{i}"), now, "timeout"))
        .collect();
    results.push(ProbeResult::failure("https://example.com/rejected", now, "timeout"));

    assert!(repo.insert_result_batch(results).await.is_err());

    let count = metric_entity::Entity::find().count(db.as_ref()).await.unwrap();
    assert_eq!(count, 0);
}
