// SPDX-License-Identifier: MIT

//! Carbon-Tracker: backend API for a carbon-footprint-tracking web app.
//!
//! Users submit daily lifestyle metrics, receive a predicted footprint from
//! an external model (with a local fallback formula), and manage a history
//! of past predictions.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Database;
use services::PredictionClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub predictor: PredictionClient,
}
