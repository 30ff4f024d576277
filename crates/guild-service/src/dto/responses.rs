//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use guild_core::entities::{MemberRole, SaleStatus};
use serde::{Deserialize, Serialize};

// ============================================================================
// Common Response Types
// ============================================================================

/// Paginated response with cursor-based pagination
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, before: Option<String>, has_more: bool, limit: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta {
                before,
                has_more,
                limit,
            },
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Cursor for fetching the next (older) page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Whether more results exist
    pub has_more: bool,
    /// Page size limit used
    pub limit: i64,
}

// ============================================================================
// Ledger Responses
// ============================================================================

/// A member's balance and how many transactions they have not seen yet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub membership_id: String,
    pub guild_id: String,
    pub user_id: String,
    pub role: MemberRole,
    pub balance: i64,
    pub unseen_transactions: i64,
    pub last_seen_balance_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub id: String,
    pub membership_id: String,
    pub amount: i64,
    pub balance_after: i64,
    pub sequence: i64,
    pub reason: Option<String>,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// Result of a single adjustment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceAdjustmentResponse {
    pub new_balance: i64,
    pub transaction: TransactionResponse,
}

/// Result of an even loot split; `remainder` is not distributed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootSplitResponse {
    pub total: i64,
    pub share: i64,
    pub remainder: i64,
    pub transactions: Vec<TransactionResponse>,
}

// ============================================================================
// Auction Responses
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleResponse {
    pub id: String,
    pub guild_id: String,
    pub created_by: String,
    pub price: i64,
    pub duration_hours: i32,
    pub expires_at: DateTime<Utc>,
    pub description: Option<String>,
    pub repair_cost: i64,
    pub silver_bags: i64,
    pub status: SaleStatus,
    pub winner_id: Option<String>,
    pub split_completed: bool,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidResponse {
    pub id: String,
    pub sale_id: String,
    pub user_id: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A sale with its full bid history and the current standings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetailsResponse {
    #[serde(flatten)]
    pub sale: SaleResponse,
    /// Every bid, oldest first
    pub bids: Vec<BidResponse>,
    /// Best bid of each bidder, leader first
    pub standings: Vec<BidResponse>,
}

/// Outcome of drawing a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawResponse {
    /// DRAWN or CANCELLED (no bids)
    pub outcome: SaleStatus,
    pub sale: SaleResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_bid: Option<BidResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<TransactionResponse>,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each backing store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: String,
}

impl ReadinessResponse {
    /// `database_healthy` is `None` when running on the in-memory store
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let (ready, database) = match database_healthy {
            Some(true) => (true, "healthy"),
            Some(false) => (false, "unhealthy"),
            None => (true, "in_memory"),
        };
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}
