// SPDX-License-Identifier: MIT

//! Stride-Coach API Server
//!
//! Fetches runs from Strava and recovery data from Whoop, and turns them
//! into coaching-ready text reports.

use std::sync::Arc;
use stride_coach::{
    config::Config,
    services::{StravaClient, StravaService, WhoopClient, WhoopService},
    token_store::TokenStore,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Stride-Coach API");

    // Token store shared by the OAuth callbacks and every data fetch
    let tokens = Arc::new(TokenStore::from_config(&config));

    let strava = StravaService::new(
        StravaClient::new(
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        ),
        tokens.clone(),
    );

    let whoop = WhoopService::new(
        WhoopClient::new(
            config.whoop_client_id.clone(),
            config.whoop_client_secret.clone(),
        ),
        tokens.clone(),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        tokens,
        strava,
        whoop,
    });

    // Build router
    let app = stride_coach::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
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

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stride_coach=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
