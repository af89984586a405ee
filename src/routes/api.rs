// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for logged-in users.

use crate::error::{AppError, Result};
use crate::middleware::auth::SessionUser;
use crate::models::subscription::UnknownTier;
use crate::models::{SubscriptionRecord, Tier, Transaction, User};
use crate::services::{PaymentDetails, ProfileUpdate};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session).
/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/account", delete(delete_account))
        .route("/api/subscription", get(get_subscription).post(subscribe))
        .route("/api/subscription/auto-renew", post(toggle_auto_renew))
        .route("/api/subscription/transactions", get(get_transactions))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub tier: Tier,
    pub is_premium: bool,
}

/// Get current user profile and plan.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
) -> Json<MeResponse> {
    let tier = state.entitlements.lock().await.current_tier();
    Json(MeResponse {
        user,
        tier,
        is_premium: tier.is_paid(),
    })
}

/// Edit name, email, or profile details.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>> {
    let user = state.entitlements.lock().await.update_profile(update)?;
    Ok(Json(user))
}

// ─── Account Deletion ────────────────────────────────────────

/// Response for account deletion.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub success: bool,
    pub message: String,
}

/// Delete the account, its subscription, and its payment history.
async fn delete_account(State(state): State<Arc<AppState>>) -> Result<Json<DeleteAccountResponse>> {
    let deleted = state.entitlements.lock().await.delete_account()?;
    tracing::info!(user_id = %deleted.id, "User-initiated account deletion");

    Ok(Json(DeleteAccountResponse {
        success: true,
        message: "Account deleted. All data has been removed.".to_string(),
    }))
}

// ─── Subscription ────────────────────────────────────────────

/// Plan state for the manage-subscription view.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub tier: Tier,
    pub subscription: Option<SubscriptionRecord>,
    /// Next charge if auto-renewing, otherwise None
    pub next_billing_date: Option<String>,
    /// Date access ends if not renewing, otherwise None
    pub expires_on: Option<String>,
}

impl SubscriptionResponse {
    fn new(tier: Tier, subscription: Option<SubscriptionRecord>) -> Self {
        let (next_billing_date, expires_on) = match &subscription {
            Some(record) if record.auto_renew => {
                (Some(format_utc_rfc3339(record.expiry_date)), None)
            }
            Some(record) => (None, Some(format_utc_rfc3339(record.expiry_date))),
            None => (None, None),
        };
        Self {
            tier,
            subscription,
            next_billing_date,
            expires_on,
        }
    }
}

async fn get_subscription(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SubscriptionResponse>> {
    let mut entitlements = state.entitlements.lock().await;
    let subscription = entitlements.subscription()?;
    let tier = entitlements.current_tier();
    Ok(Json(SubscriptionResponse::new(tier, subscription)))
}

/// Checkout form: chosen plan plus card details.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest {
    plan_id: String,
    #[serde(flatten)]
    payment: PaymentDetails,
}

/// Complete a mock purchase. No payment is taken.
async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubscribeRequest>,
) -> Result<Json<SubscriptionResponse>> {
    let plan: Tier = request
        .plan_id
        .parse()
        .map_err(|e: UnknownTier| AppError::BadRequest(e.to_string()))?;

    let mut entitlements = state.entitlements.lock().await;
    let record = entitlements.subscribe(plan, &request.payment)?;
    let tier = entitlements.current_tier();
    Ok(Json(SubscriptionResponse::new(tier, Some(record))))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AutoRenewResponse {
    pub auto_renew: bool,
}

async fn toggle_auto_renew(State(state): State<Arc<AppState>>) -> Result<Json<AutoRenewResponse>> {
    let auto_renew = state
        .entitlements
        .lock()
        .await
        .toggle_auto_renew()?
        .ok_or_else(|| AppError::NotFound("No subscription to renew".to_string()))?;

    Ok(Json(AutoRenewResponse { auto_renew }))
}

async fn get_transactions(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Transaction>>> {
    let transactions = state.entitlements.lock().await.transactions()?;
    Ok(Json(transactions))
}
