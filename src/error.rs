// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::services::{SessionError, SubscriptionError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(errors) => AppError::Validation(errors),
            SessionError::NotAuthenticated => AppError::Unauthorized,
            SessionError::Store(e) => AppError::Storage(e),
        }
    }
}

impl From<SubscriptionError> for AppError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::Validation(errors) => AppError::Validation(errors),
            SubscriptionError::NotPurchasable(_) => AppError::BadRequest(err.to_string()),
            SubscriptionError::NotAuthenticated => AppError::Unauthorized,
            SubscriptionError::Store(e) => AppError::Storage(e),
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    /// Per-field messages for form input
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

/// Flatten validator output into `field -> messages`.
fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details, fields) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None, None),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "not_found", Some(msg.clone()), None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()), None)
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                None,
                Some(field_messages(errors)),
            ),
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None, None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
