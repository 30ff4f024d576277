//! Balance transaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for balance_transactions table
#[derive(Debug, Clone, FromRow)]
pub struct TransactionModel {
    pub id: i64,
    pub membership_id: i64,
    pub amount: i64,
    pub balance_after: i64,
    pub sequence: i64,
    pub reason: Option<String>,
    pub performed_by: i64,
    pub created_at: DateTime<Utc>,
}
