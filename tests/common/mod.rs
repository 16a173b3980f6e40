// SPDX-License-Identifier: MIT

use carbon_tracker::config::Config;
use carbon_tracker::db::Database;
use carbon_tracker::middleware::auth::create_jwt;
use carbon_tracker::routes::create_router;
use carbon_tracker::services::PredictionClient;
use carbon_tracker::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn test_db_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is configured.
#[macro_export]
macro_rules! require_db {
    () => {
        if !crate::common::test_db_available() {
            eprintln!("Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database (applies migrations).
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    Database::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Database {
    Database::new_mock()
}

/// Create a session JWT for tests.
#[allow(dead_code)]
pub fn test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create test JWT")
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_db(test_db_offline())
}

/// Create a test app over a specific database handle.
#[allow(dead_code)]
pub fn create_test_app_with_db(db: Database) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    // test_default points at a closed port, so predictor calls fail fast
    // and exercise the fallback path.
    let predictor = PredictionClient::new(config.predictor_url.clone());

    let state = Arc::new(AppState {
        config,
        db,
        predictor,
    });

    (create_router(state.clone()), state)
}
