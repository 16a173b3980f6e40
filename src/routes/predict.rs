// SPDX-License-Identifier: MIT

//! Prediction route: validate inputs, ask the external model, fall back to
//! the local estimator, record the result.

use crate::db::entities::history_entry;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::estimator;
use crate::services::LifestyleInput;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Prediction route (requires authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/predict", post(predict))
}

/// Prediction request body. Numeric fields arrive as strings, exactly as the
/// frontend form submits them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    #[serde(default)]
    pub transport_mode: Option<String>,
    #[serde(default)]
    pub km_per_day: Option<String>,
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub electricity_kwh_per_day: Option<String>,
    #[serde(default)]
    pub waste_kg_per_day: Option<String>,
}

/// Prediction response body.
#[derive(Serialize)]
pub struct PredictionResult {
    pub carbon_footprint: f64,
}

/// Require a non-empty field, mirroring the presence check the original
/// form API performed.
fn required<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::BadRequest(format!(
            "Missing required field: {}",
            name
        ))),
    }
}

fn parse_number(value: &str, name: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        AppError::BadRequest(format!("Field '{}' must be a number", name))
    })
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(2)
}

/// Predict a carbon footprint and record it in the caller's history.
///
/// The external prediction service is authoritative; if it is unreachable
/// or returns a non-success status, the local estimator substitutes a value
/// and the caller never sees the difference. Exactly one history row is
/// written per successful call, whichever path produced the number.
async fn predict(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PredictionRequest>,
) -> Result<Json<PredictionResult>> {
    let transport_mode = required(&req.transport_mode, "transportMode")?;
    let km_per_day = parse_number(required(&req.km_per_day, "kmPerDay")?, "kmPerDay")?;
    let diet_type = required(&req.diet_type, "dietType")?;
    let electricity_kwh_per_day = parse_number(
        required(&req.electricity_kwh_per_day, "electricityKwhPerDay")?,
        "electricityKwhPerDay",
    )?;
    let waste_kg_per_day = parse_number(
        required(&req.waste_kg_per_day, "wasteKgPerDay")?,
        "wasteKgPerDay",
    )?;

    let input = LifestyleInput {
        transport_mode: transport_mode.to_string(),
        km_per_day,
        diet_type: diet_type.to_string(),
        electricity_kwh_per_day,
        waste_kg_per_day,
    };

    let carbon_footprint = match state.predictor.predict(&input).await {
        Ok(value) => value,
        Err(e) => {
            // Service unavailability is not an error from the caller's
            // point of view; log and substitute the local formula.
            tracing::warn!(
                error = %e,
                "Prediction service unavailable, using fallback estimator"
            );
            estimator::estimate(&input)
        }
    };

    let entry = history_entry::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id.clone()),
        transport_mode: Set(input.transport_mode.clone()),
        km_per_day: Set(to_decimal(input.km_per_day)),
        diet_type: Set(input.diet_type.clone()),
        electricity_kwh_per_day: Set(to_decimal(input.electricity_kwh_per_day)),
        waste_kg_per_day: Set(to_decimal(input.waste_kg_per_day)),
        predicted_carbon_footprint: Set(to_decimal(carbon_footprint)),
        created_at: Set(Utc::now()),
    };
    state.db.insert_history(entry).await?;

    tracing::info!(
        user_id = %user.user_id,
        carbon_footprint,
        "Prediction recorded"
    );

    Ok(Json(PredictionResult { carbon_footprint }))
}
