// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hungry Saver API Server
//!
//! Connects donors, volunteers, and community-support representatives
//! around food donations and education-aid sponsorship requests.

use hungry_saver::{
    config::Config,
    db::FirestoreDb,
    services::{AccountService, ChangeBus},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Hungry Saver API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Account service composes the identity and profile collections
    let accounts = AccountService::new(db.clone());

    // Change bus fans out mutations to live subscribers
    let changes = ChangeBus::new();
    tracing::info!("Change bus initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        accounts,
        changes,
    });

    // Build router
    let app = hungry_saver::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hungry_saver=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
