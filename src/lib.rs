// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! roxhub: membership entitlements for the Rox fitness community.
//!
//! This crate resolves a member's effective plan tier from their stored
//! subscription, gates premium features on it, and serves both to the web
//! frontend over a small local API.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::Entitlements;
use tokio::sync::Mutex;

/// Shared application state.
///
/// The entitlements context is a single logical session; the mutex keeps
/// every request's read-modify-write on it sequential.
pub struct AppState {
    pub config: Config,
    pub entitlements: Mutex<Entitlements>,
}

impl AppState {
    pub fn new(config: Config, entitlements: Entitlements) -> Self {
        Self {
            config,
            entitlements: Mutex::new(entitlements),
        }
    }
}
