//! Test fixtures and request bodies
//!
//! Response bodies are parsed with the service DTOs; requests are written out
//! here so the tests pin the wire format.

use serde::Serialize;

/// Create sale request
#[derive(Debug, Serialize)]
pub struct CreateSale {
    pub price: i64,
    pub duration_hours: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub repair_cost: i64,
    pub silver_bags: i64,
}

impl CreateSale {
    /// A 24-hour T8 tab with no costs
    pub fn t8(price: i64) -> Self {
        Self {
            price,
            duration_hours: 24,
            description: Some("T8 loot tab".to_string()),
            repair_cost: 0,
            silver_bags: 0,
        }
    }

    pub fn with_costs(mut self, repair_cost: i64, silver_bags: i64) -> Self {
        self.repair_cost = repair_cost;
        self.silver_bags = silver_bags;
        self
    }
}

/// Place bid request
#[derive(Debug, Serialize)]
pub struct PlaceBid {
    pub amount: i64,
}

/// Balance adjustment request
#[derive(Debug, Serialize)]
pub struct AdjustBalance {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AdjustBalance {
    pub fn new(amount: i64, reason: &str) -> Self {
        Self {
            amount,
            reason: Some(reason.to_string()),
        }
    }
}

/// Loot split request
#[derive(Debug, Serialize)]
pub struct SplitLoot {
    pub total: i64,
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
