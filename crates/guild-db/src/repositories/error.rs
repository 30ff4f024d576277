//! Error handling utilities for repositories

use guild_core::error::DomainError;
use guild_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Any failure while settling a draw becomes a settlement failure
pub fn into_settlement_failure(e: DomainError) -> DomainError {
    match e {
        DomainError::SettlementFailed(_) => e,
        other => DomainError::SettlementFailed(other.to_string()),
    }
}

/// Create a "sale not found" error
pub fn sale_not_found(id: Snowflake) -> DomainError {
    DomainError::SaleNotFound(id)
}

/// Create a "membership not found" error
pub fn membership_not_found() -> DomainError {
    DomainError::MembershipNotFound
}
