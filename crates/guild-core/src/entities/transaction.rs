//! Balance transaction entity - one immutable row of the ledger

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum length of a transaction reason
pub const MAX_REASON_LENGTH: usize = 500;

/// Recorded balance change
///
/// `balance_after` is the membership balance immediately after `amount` was
/// applied. `sequence` is assigned under the membership lock and counts from
/// 1, so ordered by sequence a membership's rows form a running total. Ids
/// are allocated before the lock is taken and carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceTransaction {
    pub id: Snowflake,
    pub membership_id: Snowflake,
    pub amount: i64,
    pub balance_after: i64,
    pub sequence: i64,
    pub reason: Option<String>,
    pub performed_by: Snowflake,
    pub created_at: DateTime<Utc>,
}

/// A balance change that has not been applied yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Pre-allocated id of the transaction row this entry will produce
    pub id: Snowflake,
    pub membership_id: Snowflake,
    pub amount: i64,
    pub reason: Option<String>,
    pub performed_by: Snowflake,
}

impl LedgerEntry {
    /// Build an entry, rejecting a zero amount or an oversized reason
    pub fn new(
        id: Snowflake,
        membership_id: Snowflake,
        amount: i64,
        reason: Option<String>,
        performed_by: Snowflake,
    ) -> Result<Self, DomainError> {
        if amount == 0 {
            return Err(DomainError::ZeroAmount);
        }
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if reason.as_ref().is_some_and(|r| r.chars().count() > MAX_REASON_LENGTH) {
            return Err(DomainError::ReasonTooLong {
                max: MAX_REASON_LENGTH,
            });
        }
        Ok(Self {
            id,
            membership_id,
            amount,
            reason,
            performed_by,
        })
    }

    /// Materialize the transaction once the new balance and its position in
    /// the membership's ledger are known
    pub fn into_transaction(
        self,
        balance_after: i64,
        sequence: i64,
        created_at: DateTime<Utc>,
    ) -> BalanceTransaction {
        BalanceTransaction {
            id: self.id,
            membership_id: self.membership_id,
            amount: self.amount,
            balance_after,
            sequence,
            reason: self.reason,
            performed_by: self.performed_by,
            created_at,
        }
    }
}
