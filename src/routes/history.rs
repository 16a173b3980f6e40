// SPDX-License-Identifier: MIT

//! Prediction-history routes for authenticated users.

use crate::db::entities::history_entry;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Extension, Json, Router,
};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// History routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/history", get(list_history).delete(clear_history))
        .route("/api/history/{id}", delete(delete_entry))
}

/// One history entry, camelCase to match the frontend.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub user_id: String,
    pub transport_mode: String,
    pub km_per_day: f64,
    pub diet_type: String,
    pub electricity_kwh_per_day: f64,
    pub waste_kg_per_day: f64,
    pub predicted_carbon_footprint: f64,
    pub created_at: String,
}

impl From<history_entry::Model> for HistoryEntryResponse {
    fn from(model: history_entry::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            transport_mode: model.transport_mode,
            km_per_day: model.km_per_day.to_f64().unwrap_or(0.0),
            diet_type: model.diet_type,
            electricity_kwh_per_day: model.electricity_kwh_per_day.to_f64().unwrap_or(0.0),
            waste_kg_per_day: model.waste_kg_per_day.to_f64().unwrap_or(0.0),
            predicted_carbon_footprint: model
                .predicted_carbon_footprint
                .to_f64()
                .unwrap_or(0.0),
            created_at: format_utc_rfc3339(model.created_at),
        }
    }
}

/// Simple acknowledgement body for delete operations.
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// List the caller's history, newest first.
async fn list_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<HistoryEntryResponse>>> {
    let entries = state.db.list_history(&user.user_id).await?;

    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Delete one history entry owned by the caller.
///
/// The owner filter makes cross-user deletion a silent no-op; there is no
/// not-found signal, so retries are harmless.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let entry_id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid history entry id".to_string()))?;

    state.db.delete_history_entry(entry_id, &user.user_id).await?;

    tracing::debug!(user_id = %user.user_id, entry_id = %entry_id, "History entry deleted");

    Ok(Json(MessageResponse {
        message: "Entry deleted successfully".to_string(),
    }))
}

/// Delete all of the caller's history. Idempotent.
async fn clear_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MessageResponse>> {
    state.db.delete_all_history(&user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "History cleared");

    Ok(Json(MessageResponse {
        message: "History cleared successfully".to_string(),
    }))
}
