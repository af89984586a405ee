// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, registration, and logout routes.
//!
//! Login is a mock: any non-empty email and password are accepted.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::Result;
use crate::models::{Tier, User};
use crate::services::{LoginForm, RegisterForm};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
}

/// Session state after login or registration.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub success: bool,
    pub user: User,
    pub tier: Tier,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogoutResponse {
    pub success: bool,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionResponse>> {
    let mut entitlements = state.entitlements.lock().await;
    let user = entitlements.login(&form)?;
    let tier = entitlements.current_tier();

    Ok(Json(SessionResponse {
        success: true,
        user,
        tier,
    }))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RegisterForm>,
) -> Result<Json<SessionResponse>> {
    let mut entitlements = state.entitlements.lock().await;
    let user = entitlements.register(&form)?;
    let tier = entitlements.current_tier();

    Ok(Json(SessionResponse {
        success: true,
        user,
        tier,
    }))
}

async fn logout(State(state): State<Arc<AppState>>) -> Json<LogoutResponse> {
    state.entitlements.lock().await.logout();
    Json(LogoutResponse { success: true })
}
