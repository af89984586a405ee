// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use roxhub::config::Config;
use roxhub::db::{keys, KvStoreExt, MemoryStore, Store};
use roxhub::models::{SubscriptionRecord, Tier};
use roxhub::routes::create_router;
use roxhub::services::Entitlements;
use roxhub::time_utils::FixedClock;
use roxhub::AppState;
use serde_json::Value;
use std::sync::Arc;

/// Fixed starting instant for every test app.
#[allow(dead_code)]
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap()
}

/// Everything a test needs to drive and inspect the app.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Store,
    pub clock: Arc<FixedClock>,
}

/// Create a test app on an in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with_store(MemoryStore::new().shared())
}

/// Create a test app over an existing store, hydrating any stored session.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Store) -> TestApp {
    let clock = Arc::new(FixedClock::new(test_now()));
    let entitlements = Entitlements::init(store.clone(), clock.clone());
    let state = Arc::new(AppState::new(Config::default(), entitlements));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        clock,
    }
}

/// Write a subscription record for `user_id` expiring at `expiry`.
#[allow(dead_code)]
pub fn seed_subscription(
    store: &Store,
    user_id: &str,
    plan: Tier,
    expiry: DateTime<Utc>,
    auto_renew: bool,
) {
    let mut record = SubscriptionRecord::start(plan.plan(), expiry - Duration::days(30));
    record.auto_renew = auto_renew;
    store
        .set_json(&keys::subscription(user_id), &record)
        .expect("Failed to seed subscription");
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}

/// Log in as the mock user.
#[allow(dead_code)]
pub async fn login(app: &TestApp) -> Value {
    use tower::ServiceExt;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/auth/login",
            Some(serde_json::json!({"email": "max@rox.fit", "password": "secret"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

/// A card that passes checkout validation.
#[allow(dead_code)]
pub fn valid_card() -> Value {
    serde_json::json!({
        "cardNumber": "4242424242424242",
        "cardName": "Max Power",
        "expiry": "12/29",
        "cvv": "123"
    })
}
