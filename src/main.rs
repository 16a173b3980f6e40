// SPDX-License-Identifier: MIT

//! Carbon-Tracker API Server
//!
//! Serves profile, prediction and history endpoints for the carbon-footprint
//! tracker frontend, backed by Postgres and an external prediction model.

use carbon_tracker::{
    config::Config, db::Database, services::PredictionClient, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Carbon-Tracker API");

    // Connect to Postgres and apply migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // External prediction service client
    let predictor = PredictionClient::new(config.predictor_url.clone());
    tracing::info!(url = %config.predictor_url, "Prediction client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        predictor,
    });

    // Build router
    let app = carbon_tracker::routes::create_router(state);

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
                .add_directive("carbon_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
