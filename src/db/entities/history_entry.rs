//! `user_history` table: immutable prediction records.
//!
//! `user_id` stores the identity-provider ID directly rather than a foreign
//! key to `user_profiles.id`; history survives profile deletion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub transport_mode: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub km_per_day: Decimal,
    pub diet_type: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub electricity_kwh_per_day: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub waste_kg_per_day: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub predicted_carbon_footprint: Decimal,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
