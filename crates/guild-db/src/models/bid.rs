//! Loot-tab bid database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for loot_tab_bids table
#[derive(Debug, Clone, FromRow)]
pub struct BidModel {
    pub id: i64,
    pub sale_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
