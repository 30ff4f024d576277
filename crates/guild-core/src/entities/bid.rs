//! Loot-tab bid entity - one participant entry in a sale

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// A bid on a sale; a user may hold several, all kept as history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LootTabBid {
    pub id: Snowflake,
    pub sale_id: Snowflake,
    pub user_id: Snowflake,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

impl LootTabBid {
    pub fn new(id: Snowflake, sale_id: Snowflake, user_id: Snowflake, amount: i64) -> Self {
        Self {
            id,
            sale_id,
            user_id,
            amount,
            created_at: Utc::now(),
        }
    }
}
