// SPDX-License-Identifier: MIT

//! Database layer (Postgres via SeaORM) with typed operations.
//!
//! Provides high-level operations for:
//! - User profiles (keyed by identity-provider ID)
//! - History entries (immutable prediction records)
//!
//! The connection is acquired once at startup and passed around explicitly
//! through `AppState`; there is no ambient module-level handle.

pub mod entities;

use crate::error::AppError;
use entities::{history_entry, user_profile, HistoryEntry, UserProfile};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, Statement,
};
use std::time::Duration;
use uuid::Uuid;

/// Database client wrapper.
#[derive(Clone)]
pub struct Database {
    conn: Option<DatabaseConnection>,
}

impl Database {
    /// Connect to Postgres and apply pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let mut opt = ConnectOptions::new(database_url);
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = sea_orm::Database::connect(opt)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        let db = Self { conn: Some(conn) };
        db.run_migrations().await?;

        tracing::info!("Connected to Postgres");
        Ok(db)
    }

    /// Create a mock database client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { conn: None }
    }

    /// Helper to get the connection or return an error if offline.
    fn get_conn(&self) -> Result<&DatabaseConnection, AppError> {
        self.conn
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Apply the schema migration. Statements are `IF NOT EXISTS` style, so
    /// running them on every startup is safe.
    async fn run_migrations(&self) -> Result<(), AppError> {
        let migration = include_str!("../../migrations/001_initial.sql");
        let conn = self.get_conn()?;

        for statement in migration.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            conn.execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                statement.to_string(),
            ))
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        }

        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a profile by identity-provider ID.
    pub async fn get_profile(
        &self,
        clerk_id: &str,
    ) -> Result<Option<user_profile::Model>, AppError> {
        Ok(UserProfile::find()
            .filter(user_profile::Column::ClerkId.eq(clerk_id))
            .one(self.get_conn()?)
            .await?)
    }

    /// Insert a new profile row.
    pub async fn insert_profile(
        &self,
        profile: user_profile::ActiveModel,
    ) -> Result<user_profile::Model, AppError> {
        Ok(profile.insert(self.get_conn()?).await?)
    }

    /// Update an existing profile row. Only fields set on the active model
    /// are written.
    pub async fn update_profile(
        &self,
        profile: user_profile::ActiveModel,
    ) -> Result<user_profile::Model, AppError> {
        Ok(profile.update(self.get_conn()?).await?)
    }

    /// Delete the profile for an identity-provider ID. A no-op if no row
    /// matches.
    pub async fn delete_profile(&self, clerk_id: &str) -> Result<(), AppError> {
        UserProfile::delete_many()
            .filter(user_profile::Column::ClerkId.eq(clerk_id))
            .exec(self.get_conn()?)
            .await?;
        Ok(())
    }

    // ─── History Operations ──────────────────────────────────────

    /// Insert a new history entry.
    pub async fn insert_history(
        &self,
        entry: history_entry::ActiveModel,
    ) -> Result<history_entry::Model, AppError> {
        Ok(entry.insert(self.get_conn()?).await?)
    }

    /// List all history entries for a user, newest first.
    pub async fn list_history(&self, user_id: &str) -> Result<Vec<history_entry::Model>, AppError> {
        Ok(HistoryEntry::find()
            .filter(history_entry::Column::UserId.eq(user_id))
            .order_by_desc(history_entry::Column::CreatedAt)
            .all(self.get_conn()?)
            .await?)
    }

    /// Delete one history entry, scoped to its owner. Deleting an entry that
    /// does not exist (or belongs to someone else) is not an error.
    pub async fn delete_history_entry(&self, id: Uuid, user_id: &str) -> Result<(), AppError> {
        HistoryEntry::delete_many()
            .filter(history_entry::Column::Id.eq(id))
            .filter(history_entry::Column::UserId.eq(user_id))
            .exec(self.get_conn()?)
            .await?;
        Ok(())
    }

    /// Delete all history entries for a user. Idempotent.
    pub async fn delete_all_history(&self, user_id: &str) -> Result<(), AppError> {
        HistoryEntry::delete_many()
            .filter(history_entry::Column::UserId.eq(user_id))
            .exec(self.get_conn()?)
            .await?;
        Ok(())
    }
}
