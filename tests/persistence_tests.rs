// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session and subscription state surviving a restart on the file store.

use axum::http::{Method, StatusCode};
use chrono::Duration;
use roxhub::db::{keys, FileStore, KvStore, Store, StoreError};
use roxhub::models::Tier;
use std::sync::Arc;
use tower::ServiceExt;

mod common;
use common::{
    body_json, create_test_app_with_store, json_request, login, seed_subscription, test_now,
};

fn open(path: &std::path::Path) -> Store {
    Arc::new(FileStore::open(path).expect("Failed to open store"))
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roxhub.json");

    {
        let store = open(&path);
        seed_subscription(&store, "1", Tier::Premium, test_now() + Duration::days(10), true);
        let app = create_test_app_with_store(store);
        login(&app).await;
    }

    let app = create_test_app_with_store(open(&path));
    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/me", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], "1");
    assert_eq!(body["tier"], "premium");
}

#[tokio::test]
async fn test_logout_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roxhub.json");

    {
        let app = create_test_app_with_store(open(&path));
        login(&app).await;
        app.state.entitlements.lock().await.logout();
    }

    let app = create_test_app_with_store(open(&path));
    assert!(!app.state.entitlements.lock().await.is_authenticated());
}

#[tokio::test]
async fn test_corrupt_session_starts_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roxhub.json");

    let store = open(&path);
    store.set(keys::SESSION_USER, "{not json".to_string()).unwrap();

    let app = create_test_app_with_store(store.clone());

    assert!(!app.state.entitlements.lock().await.is_authenticated());
    assert!(store.get(keys::SESSION_USER).unwrap().is_none());
}

#[tokio::test]
async fn test_corrupt_subscription_reads_as_free() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roxhub.json");

    let store = open(&path);
    store
        .set(&keys::subscription("1"), "[1, 2, 3]".to_string())
        .unwrap();
    let app = create_test_app_with_store(store.clone());
    login(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/me", None))
        .await
        .unwrap();

    assert_eq!(body_json(response).await["tier"], "free");
    assert!(store.get(&keys::subscription("1")).unwrap().is_none());
}

#[test]
fn test_unreadable_data_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roxhub.json");
    std::fs::write(&path, "garbage").unwrap();

    assert!(matches!(
        FileStore::open(&path),
        Err(StoreError::Corrupt { .. })
    ));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage");
}
