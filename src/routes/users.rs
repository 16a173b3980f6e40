// SPDX-License-Identifier: MIT

//! Profile routes for authenticated users.

use crate::db::entities::user_profile;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, IntoActiveModel};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Profile routes (require authentication).
/// The auth middleware is applied in routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/users",
        get(get_profile).post(upsert_profile).put(update_preferences),
    )
}

/// Deserialize a string field treating the empty string as absent.
///
/// The profile upsert merge only overwrites stored values with non-empty
/// input; making that policy part of the request type keeps it visible in
/// the signature instead of hiding it in handler logic.
fn empty_string_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Profile response, camelCase to match the frontend.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: Uuid,
    pub clerk_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub preferred_transport_mode: Option<String>,
    pub preferred_diet_type: Option<String>,
    pub carbon_footprint_goal: Option<f64>,
    pub notifications_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<user_profile::Model> for ProfileResponse {
    fn from(model: user_profile::Model) -> Self {
        Self {
            id: model.id,
            clerk_id: model.clerk_id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            image_url: model.image_url,
            preferred_transport_mode: model.preferred_transport_mode,
            preferred_diet_type: model.preferred_diet_type,
            carbon_footprint_goal: model.carbon_footprint_goal.and_then(|d| d.to_f64()),
            notifications_enabled: model.notifications_enabled,
            created_at: format_utc_rfc3339(model.created_at),
            updated_at: format_utc_rfc3339(model.updated_at),
        }
    }
}

/// Get current user profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(profile.into()))
}

/// Create-or-update request body.
///
/// Identity-sourced fields (email, names, image) and string preferences go
/// through `empty_string_as_none`: an empty or missing value never
/// overwrites a stored one.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpsertRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub preferred_transport_mode: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub preferred_diet_type: Option<String>,
    #[serde(default)]
    pub carbon_footprint_goal: Option<f64>,
    #[serde(default)]
    pub notifications_enabled: Option<bool>,
}

fn goal_to_decimal(goal: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(goal).map(|d| d.round_dp(2))
}

/// Merge request fields into an existing profile row.
///
/// Only fields the request actually supplies are marked for update; stored
/// values survive everything else. The notifications flag is the one field
/// where `false` is a real value and must still be applied.
fn merge_profile(
    existing: user_profile::Model,
    req: &ProfileUpsertRequest,
) -> user_profile::ActiveModel {
    let mut active = existing.into_active_model();

    if let Some(email) = &req.email {
        active.email = Set(email.clone());
    }
    if let Some(first_name) = &req.first_name {
        active.first_name = Set(Some(first_name.clone()));
    }
    if let Some(last_name) = &req.last_name {
        active.last_name = Set(Some(last_name.clone()));
    }
    if let Some(image_url) = &req.image_url {
        active.image_url = Set(Some(image_url.clone()));
    }
    if let Some(mode) = &req.preferred_transport_mode {
        active.preferred_transport_mode = Set(Some(mode.clone()));
    }
    if let Some(diet) = &req.preferred_diet_type {
        active.preferred_diet_type = Set(Some(diet.clone()));
    }
    if let Some(goal) = req.carbon_footprint_goal {
        active.carbon_footprint_goal = Set(goal_to_decimal(goal));
    }
    if let Some(enabled) = req.notifications_enabled {
        active.notifications_enabled = Set(enabled);
    }
    active.updated_at = Set(Utc::now());

    active
}

/// Create or update the caller's profile.
///
/// First call creates the row; later calls merge non-empty fields into it.
/// There is never more than one row per identity-provider ID.
async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<ProfileUpsertRequest>,
) -> Result<Json<ProfileResponse>> {
    let updated = match state.db.get_profile(&user.user_id).await? {
        Some(existing) => {
            let active = merge_profile(existing, &req);
            state.db.update_profile(active).await?
        }
        None => {
            let now = Utc::now();
            let active = user_profile::ActiveModel {
                id: Set(Uuid::new_v4()),
                clerk_id: Set(user.user_id.clone()),
                email: Set(req.email.clone().unwrap_or_default()),
                first_name: Set(req.first_name.clone()),
                last_name: Set(req.last_name.clone()),
                image_url: Set(req.image_url.clone()),
                preferred_transport_mode: Set(req.preferred_transport_mode.clone()),
                preferred_diet_type: Set(req.preferred_diet_type.clone()),
                carbon_footprint_goal: Set(req.carbon_footprint_goal.and_then(goal_to_decimal)),
                notifications_enabled: Set(req.notifications_enabled.unwrap_or(true)),
                created_at: Set(now),
                updated_at: Set(now),
            };
            state.db.insert_profile(active).await?
        }
    };

    Ok(Json(updated.into()))
}

/// Preference update request body.
///
/// Unlike the upsert merge, values present here are applied verbatim; only
/// absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesRequest {
    pub preferred_transport_mode: Option<String>,
    pub preferred_diet_type: Option<String>,
    pub carbon_footprint_goal: Option<f64>,
    pub notifications_enabled: Option<bool>,
}

/// Update the caller's preference fields only.
async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PreferencesRequest>,
) -> Result<Json<ProfileResponse>> {
    let existing = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active = existing.into_active_model();

    if let Some(mode) = req.preferred_transport_mode {
        active.preferred_transport_mode = Set(Some(mode));
    }
    if let Some(diet) = req.preferred_diet_type {
        active.preferred_diet_type = Set(Some(diet));
    }
    if let Some(goal) = req.carbon_footprint_goal {
        active.carbon_footprint_goal = Set(goal_to_decimal(goal));
    }
    if let Some(enabled) = req.notifications_enabled {
        active.notifications_enabled = Set(enabled);
    }
    active.updated_at = Set(Utc::now());

    let updated = state.db.update_profile(active).await?;

    Ok(Json(updated.into()))
}
