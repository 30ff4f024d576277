//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Snowflake IDs arrive as strings and are parsed by the services.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Ledger Requests
// ============================================================================

/// Manual balance adjustment by an officer
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AdjustBalanceRequest {
    /// Signed amount; positive credits, negative debits
    pub amount: i64,

    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

/// Even split of a loot total among participants
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SplitLootRequest {
    #[validate(range(min = 1, message = "Total must be positive"))]
    pub total: i64,

    /// Participant user IDs; duplicates are ignored
    #[validate(length(min = 1, max = 300, message = "Between 1 and 300 participants required"))]
    pub participants: Vec<String>,

    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
}

// ============================================================================
// Auction Requests
// ============================================================================

/// Open a new loot-tab sale
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSaleRequest {
    #[validate(range(min = 1, message = "Price must be positive"))]
    pub price: i64,

    #[validate(range(min = 1, max = 168, message = "Duration must be 1-168 hours"))]
    pub duration_hours: i32,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Repair cost must not be negative"))]
    pub repair_cost: i64,

    #[serde(default)]
    #[validate(range(min = 0, message = "Silver bags must not be negative"))]
    pub silver_bags: i64,
}

/// Bid on an open sale
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceBidRequest {
    #[validate(range(min = 1, message = "Bid amount must be positive"))]
    pub amount: i64,
}

/// Filter for listing a guild's sales
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSalesQuery {
    /// OPEN, DRAWN or CANCELLED (case-insensitive)
    pub status: Option<String>,
}
