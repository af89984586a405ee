// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Feature gate and upsell prompt tests over HTTP.

use axum::http::{Method, StatusCode};
use chrono::Duration;
use roxhub::models::Tier;
use serde_json::Value;
use tower::ServiceExt;

mod common;
use common::{body_json, create_test_app, json_request, login, seed_subscription, test_now, TestApp};

async fn check(app: &TestApp, feature: &str) -> Value {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/features/{}/access", feature),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn upsell(app: &TestApp) -> Value {
    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/upsell", None))
        .await
        .unwrap();
    body_json(response).await
}

#[tokio::test]
async fn test_free_user_denied_with_upsell() {
    let app = create_test_app();
    login(&app).await;

    let body = check(&app, "roxpartner").await;

    assert_eq!(body["allowed"], false);
    assert_eq!(body["tier"], "free");
    assert_eq!(body["upsell"], "roxpartner");

    let prompt = upsell(&app).await;
    assert_eq!(prompt["open"], true);
    assert_eq!(prompt["feature"], "roxpartner");
}

#[tokio::test]
async fn test_logged_out_visitor_is_free_tier() {
    let app = create_test_app();
    seed_subscription(&app.store, "1", Tier::Pro, test_now() + Duration::days(5), true);

    let body = check(&app, "community-forum").await;

    assert_eq!(body["allowed"], false);
    assert_eq!(body["tier"], "free");
}

#[tokio::test]
async fn test_pro_user_allowed_and_upsell_cleared() {
    let app = create_test_app();
    seed_subscription(&app.store, "1", Tier::Pro, test_now() + Duration::days(5), true);

    // Denied while logged out opens the prompt
    check(&app, "roxpartner").await;
    assert_eq!(upsell(&app).await["open"], true);

    // Login is an identity change and closes it
    login(&app).await;
    assert_eq!(upsell(&app).await["open"], false);

    let body = check(&app, "roxpartner").await;
    assert_eq!(body["allowed"], true);
    assert_eq!(body["tier"], "pro");
    assert_eq!(body["upsell"], Value::Null);
}

#[tokio::test]
async fn test_premium_denied_pro_only_feature() {
    let app = create_test_app();
    seed_subscription(&app.store, "1", Tier::Premium, test_now() + Duration::days(5), false);
    login(&app).await;

    assert_eq!(check(&app, "messaging").await["allowed"], true);

    let body = check(&app, "priority-support").await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["upsell"], "priority-support");

    // A later allowed check hides the prompt again
    assert_eq!(check(&app, "messaging").await["allowed"], true);
    assert_eq!(upsell(&app).await["open"], false);
}

#[tokio::test]
async fn test_repeated_checks_are_idempotent() {
    let app = create_test_app();
    login(&app).await;

    let first = check(&app, "roxexchange").await;
    let second = check(&app, "roxexchange").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unknown_feature_denied_without_upsell() {
    let app = create_test_app();
    seed_subscription(&app.store, "1", Tier::Pro, test_now() + Duration::days(5), true);
    login(&app).await;

    let body = check(&app, "teleportation").await;

    assert_eq!(body["allowed"], false);
    assert_eq!(body["feature"], "teleportation");
    assert_eq!(body["upsell"], Value::Null);
    assert_eq!(upsell(&app).await["open"], false);

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/features/teleportation", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_feature_hides_earlier_upsell() {
    let app = create_test_app();
    login(&app).await;

    assert_eq!(check(&app, "roxpartner").await["upsell"], "roxpartner");

    let body = check(&app, "teleportation").await;

    assert_eq!(body["allowed"], false);
    assert_eq!(body["upsell"], Value::Null);
    assert_eq!(upsell(&app).await["open"], false);
}

#[tokio::test]
async fn test_feature_lookup_leaves_prompt_alone() {
    let app = create_test_app();
    login(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/features/ROXPARTNER", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["feature"], "roxpartner");
    assert_eq!(body["allowed"], false);
    assert_eq!(upsell(&app).await["open"], false);
}

#[tokio::test]
async fn test_close_upsell() {
    let app = create_test_app();
    login(&app).await;
    check(&app, "analytics-dashboard").await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::DELETE, "/api/upsell", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["open"], false);

    let prompt = upsell(&app).await;
    assert_eq!(prompt["open"], false);
    assert_eq!(prompt["feature"], Value::Null);

    // Closing does not change access
    assert_eq!(check(&app, "analytics-dashboard").await["allowed"], false);
}

#[tokio::test]
async fn test_catalog_lists_plans_and_features() {
    let app = create_test_app();

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/plans", None))
        .await
        .unwrap();
    let plans = body_json(response).await;
    assert_eq!(plans.as_array().unwrap().len(), 3);
    assert_eq!(plans[0]["id"], "free");
    assert_eq!(plans[2]["price"], 49.99);

    let response = app
        .router
        .clone()
        .oneshot(json_request(Method::GET, "/api/features", None))
        .await
        .unwrap();
    let features = body_json(response).await;
    let features = features.as_array().unwrap();
    assert_eq!(features.len(), 11);

    let support = features
        .iter()
        .find(|f| f["id"] == "priority-support")
        .unwrap();
    assert_eq!(support["allowedTiers"], serde_json::json!(["pro"]));
}
