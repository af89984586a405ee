// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan catalog, capability table, access checks, and the upsell prompt.

use crate::error::{AppError, Result};
use crate::models::{Feature, Plan, Tier};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", get(list_plans))
        .route("/api/features", get(list_features))
        .route("/api/features/{feature}", get(get_feature))
        .route("/api/features/{feature}/access", post(check_access))
        .route("/api/upsell", get(get_upsell).delete(close_upsell))
}

// ─── Catalog ─────────────────────────────────────────────────

async fn list_plans() -> Json<Vec<Plan>> {
    Json(Tier::ALL.iter().map(Tier::plan).collect())
}

/// One row of the capability table.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEntry {
    pub id: Feature,
    pub allowed_tiers: Vec<Tier>,
}

async fn list_features() -> Json<Vec<FeatureEntry>> {
    Json(
        Feature::ALL
            .into_iter()
            .map(|feature| FeatureEntry {
                id: feature,
                allowed_tiers: feature.allowed_tiers().to_vec(),
            })
            .collect(),
    )
}

// ─── Access ──────────────────────────────────────────────────

/// Outcome of an access query.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccessResponse {
    pub feature: String,
    pub tier: Tier,
    pub allowed: bool,
    /// Feature the upsell prompt is shown for after this check
    pub upsell: Option<Feature>,
}

/// Pure lookup: does the current tier unlock this feature?
async fn get_feature(
    State(state): State<Arc<AppState>>,
    Path(feature_id): Path<String>,
) -> Result<Json<AccessResponse>> {
    let feature: Feature = feature_id
        .parse()
        .map_err(|e: crate::models::feature::UnknownFeature| AppError::NotFound(e.to_string()))?;

    let mut entitlements = state.entitlements.lock().await;
    let tier = entitlements.current_tier();
    Ok(Json(AccessResponse {
        feature: feature.id().to_string(),
        tier,
        allowed: entitlements.is_feature_enabled(feature),
        upsell: entitlements.current_feature(),
    }))
}

/// Access check that also drives the upsell prompt.
///
/// Unknown identifiers answer `allowed: false` and leave the prompt alone.
async fn check_access(
    State(state): State<Arc<AppState>>,
    Path(feature_id): Path<String>,
) -> Json<AccessResponse> {
    let mut entitlements = state.entitlements.lock().await;
    let allowed = entitlements.check_feature_id(&feature_id);
    let tier = entitlements.current_tier();

    Json(AccessResponse {
        feature: feature_id,
        tier,
        allowed,
        upsell: entitlements.current_feature(),
    })
}

// ─── Upsell Prompt ───────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpsellResponse {
    pub open: bool,
    pub feature: Option<Feature>,
}

async fn get_upsell(State(state): State<Arc<AppState>>) -> Json<UpsellResponse> {
    let entitlements = state.entitlements.lock().await;
    Json(UpsellResponse {
        open: entitlements.is_premium_modal_open(),
        feature: entitlements.current_feature(),
    })
}

async fn close_upsell(State(state): State<Arc<AppState>>) -> Json<UpsellResponse> {
    let mut entitlements = state.entitlements.lock().await;
    entitlements.close_premium_modal();
    Json(UpsellResponse {
        open: false,
        feature: None,
    })
}
