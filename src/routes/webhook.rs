// SPDX-License-Identifier: MIT

//! Webhook route for identity-provider (Clerk) life-cycle events.
//!
//! No signature verification is performed; the trust boundary relies on the
//! provider's delivery guarantee.

use crate::db::entities::user_profile;
use crate::error::Result;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use sea_orm::{ActiveValue::Set, IntoActiveModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Webhook routes (public).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/webhooks/clerk", post(handle_event))
}

/// Identity-provider life-cycle event.
#[derive(Debug, Deserialize)]
pub struct ClerkWebhookEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ClerkUserData,
}

/// Deserialize a nullable field keeping "key absent" distinct from an
/// explicit JSON `null`.
///
/// Update events only touch the columns whose keys are present; an absent
/// key leaves the stored value alone, while `"first_name": null` really
/// clears it.
fn present_or_null<'de, T, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// User payload carried by the event.
#[derive(Debug, Deserialize)]
pub struct ClerkUserData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub image_url: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ClerkEmailAddress {
    pub email_address: String,
}

impl ClerkUserData {
    fn primary_email(&self) -> Option<String> {
        self.email_addresses
            .first()
            .map(|e| e.email_address.clone())
    }
}

#[derive(Serialize)]
struct WebhookResponse {
    success: bool,
}

/// Handle an incoming life-cycle event (POST).
async fn handle_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ClerkWebhookEvent>,
) -> Result<Json<WebhookResponse>> {
    tracing::info!(
        kind = %event.kind,
        user_id = %event.data.id,
        "Identity webhook event received"
    );

    match event.kind.as_str() {
        "user.created" => {
            // Idempotent against duplicate delivery: only insert when no
            // row exists for this ID yet.
            if state.db.get_profile(&event.data.id).await?.is_none() {
                let now = Utc::now();
                let profile = user_profile::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    clerk_id: Set(event.data.id.clone()),
                    email: Set(event.data.primary_email().unwrap_or_default()),
                    first_name: Set(event.data.first_name.clone().flatten()),
                    last_name: Set(event.data.last_name.clone().flatten()),
                    image_url: Set(event.data.image_url.clone().flatten()),
                    preferred_transport_mode: Set(None),
                    preferred_diet_type: Set(None),
                    carbon_footprint_goal: Set(None),
                    notifications_enabled: Set(true),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                state.db.insert_profile(profile).await?;
                tracing::info!(user_id = %event.data.id, "Profile created from webhook");
            }
        }
        "user.updated" => {
            if let Some(existing) = state.db.get_profile(&event.data.id).await? {
                let mut active = existing.into_active_model();
                if let Some(email) = event.data.primary_email() {
                    active.email = Set(email);
                }
                if let Some(first_name) = &event.data.first_name {
                    active.first_name = Set(first_name.clone());
                }
                if let Some(last_name) = &event.data.last_name {
                    active.last_name = Set(last_name.clone());
                }
                if let Some(image_url) = &event.data.image_url {
                    active.image_url = Set(image_url.clone());
                }
                active.updated_at = Set(Utc::now());
                state.db.update_profile(active).await?;
            } else {
                // No row to update; the provider may deliver updates before
                // the created event.
                tracing::debug!(user_id = %event.data.id, "Update for unknown profile ignored");
            }
        }
        "user.deleted" => {
            // History rows are intentionally left in place; only the
            // profile row is removed.
            state.db.delete_profile(&event.data.id).await?;
            tracing::info!(user_id = %event.data.id, "Profile deleted from webhook");
        }
        _ => {
            tracing::debug!(kind = %event.kind, "Ignoring unhandled event type");
        }
    }

    Ok(Json(WebhookResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_parses_with_minimal_data() {
        let event: ClerkWebhookEvent = serde_json::from_str(
            r#"{"type": "user.deleted", "data": {"id": "user_123"}}"#,
        )
        .unwrap();

        assert_eq!(event.kind, "user.deleted");
        assert_eq!(event.data.id, "user_123");
        assert!(event.data.primary_email().is_none());
    }

    #[test]
    fn test_primary_email_takes_first_address() {
        let event: ClerkWebhookEvent = serde_json::from_str(
            r#"{
                "type": "user.created",
                "data": {
                    "id": "user_123",
                    "email_addresses": [
                        {"email_address": "first@example.com"},
                        {"email_address": "second@example.com"}
                    ],
                    "first_name": "Ada"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            event.data.primary_email().as_deref(),
            Some("first@example.com")
        );
        assert_eq!(event.data.first_name, Some(Some("Ada".to_string())));
    }

    #[test]
    fn test_absent_name_key_is_distinct_from_null() {
        // Key omitted entirely: the stored value must be left alone.
        let omitted: ClerkWebhookEvent = serde_json::from_str(
            r#"{"type": "user.updated", "data": {"id": "user_123"}}"#,
        )
        .unwrap();
        assert_eq!(omitted.data.first_name, None);

        // Key present as null: an explicit request to clear the value.
        let nulled: ClerkWebhookEvent = serde_json::from_str(
            r#"{"type": "user.updated", "data": {"id": "user_123", "first_name": null}}"#,
        )
        .unwrap();
        assert_eq!(nulled.data.first_name, Some(None));
    }
}
