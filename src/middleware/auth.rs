// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session middleware.
//!
//! There is no token to verify: the service holds one session, and a
//! request is authenticated when that session has a user.

use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// User attached to requests that passed [`require_session`].
#[derive(Debug, Clone)]
pub struct SessionUser(pub User);

/// Middleware that requires a logged-in session.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let user = state
        .entitlements
        .lock()
        .await
        .user()
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(SessionUser(user));

    Ok(next.run(request).await)
}
