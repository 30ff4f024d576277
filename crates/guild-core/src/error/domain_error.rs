//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::{MemberRole, SaleStatus};
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Membership not found")]
    MembershipNotFound,

    #[error("Loot tab sale not found: {0}")]
    SaleNotFound(Snowflake),

    #[error("Bid not found: {0}")]
    BidNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Amount must not be zero")]
    ZeroAmount,

    #[error("Reason too long: max {max} characters")]
    ReasonTooLong { max: usize },

    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Duration must be between {min} and {max} hours")]
    InvalidDuration { min: i32, max: i32 },

    #[error("Invalid costs: {0}")]
    InvalidCosts(String),

    #[error("Bid is below the sale price of {price}")]
    BidBelowReserve { price: i64 },

    #[error("Description too long: max {max} characters")]
    DescriptionTooLong { max: usize },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Requires role {required} or higher")]
    InsufficientRole { required: MemberRole },

    #[error("Membership is not active")]
    MembershipInactive,

    #[error("Not a member of this guild")]
    NotGuildMember,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Sale is not open (status {status})")]
    SaleNotOpen { status: SaleStatus },

    #[error("Sale has expired")]
    SaleExpired,

    #[error("Sale has already been settled")]
    SplitCompleted,

    #[error("Already a member of this guild")]
    AlreadyMember,

    // =========================================================================
    // Settlement Errors
    // =========================================================================
    #[error("Settlement failed: {0}")]
    SettlementFailed(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MembershipNotFound => "UNKNOWN_MEMBER",
            Self::SaleNotFound(_) => "UNKNOWN_SALE",
            Self::BidNotFound(_) => "UNKNOWN_BID",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::ReasonTooLong { .. } => "REASON_TOO_LONG",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidDuration { .. } => "INVALID_DURATION",
            Self::InvalidCosts(_) => "INVALID_COSTS",
            Self::BidBelowReserve { .. } => "BID_BELOW_PRICE",
            Self::DescriptionTooLong { .. } => "DESCRIPTION_TOO_LONG",

            // Authorization
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::MembershipInactive => "MEMBERSHIP_INACTIVE",
            Self::NotGuildMember => "NOT_GUILD_MEMBER",

            // Conflict
            Self::SaleNotOpen { .. } => "SALE_NOT_OPEN",
            Self::SaleExpired => "SALE_EXPIRED",
            Self::SplitCompleted => "SPLIT_COMPLETED",
            Self::AlreadyMember => "ALREADY_MEMBER",

            // Settlement
            Self::SettlementFailed(_) => "SETTLEMENT_FAILED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MembershipNotFound | Self::SaleNotFound(_) | Self::BidNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::ZeroAmount
                | Self::ReasonTooLong { .. }
                | Self::InvalidPrice
                | Self::InvalidDuration { .. }
                | Self::InvalidCosts(_)
                | Self::BidBelowReserve { .. }
                | Self::DescriptionTooLong { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::InsufficientRole { .. } | Self::MembershipInactive | Self::NotGuildMember
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::SaleNotOpen { .. } | Self::SaleExpired | Self::SplitCompleted | Self::AlreadyMember
        )
    }

    /// Settlement failed and was rolled back; the caller may retry
    pub fn is_settlement_failure(&self) -> bool {
        matches!(self, Self::SettlementFailed(_))
    }
}
