//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub guild_id: i64,
    pub user_id: i64,
    pub role: String,
    pub status: String,
    pub balance: i64,
    pub last_seen_balance_at: Option<DateTime<Utc>>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
