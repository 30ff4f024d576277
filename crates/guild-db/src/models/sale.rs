//! Loot-tab sale database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for loot_tab_sales table
#[derive(Debug, Clone, FromRow)]
pub struct SaleModel {
    pub id: i64,
    pub guild_id: i64,
    pub created_by: i64,
    pub price: i64,
    pub duration_hours: i32,
    pub expires_at: DateTime<Utc>,
    pub description: Option<String>,
    pub repair_cost: i64,
    pub silver_bags: i64,
    pub status: String,
    pub winner_id: Option<i64>,
    pub split_completed: bool,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}
