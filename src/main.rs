// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! roxhub API Server
//!
//! Serves session, subscription, and feature-access state for the Rox
//! frontend from a local data file.

use roxhub::{
    config::Config,
    db::FileStore,
    services::Entitlements,
    time_utils::SystemClock,
    AppState,
};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting roxhub API");

    // Open the durable store and restore the session
    let store = FileStore::open(&config.data_path)
        .with_context(|| format!("Failed to open {}", config.data_path.display()))?;
    let entitlements = Entitlements::init(Arc::new(store), Arc::new(SystemClock));
    tracing::info!(
        authenticated = entitlements.is_authenticated(),
        "Entitlements initialized"
    );

    let state = Arc::new(AppState::new(config.clone(), entitlements));

    // Build router
    let app = roxhub::routes::create_router(state);

    // Start server
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("roxhub=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
