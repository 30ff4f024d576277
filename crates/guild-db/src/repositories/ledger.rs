//! PostgreSQL implementation of LedgerRepository
//!
//! The balance update takes the membership row lock, so concurrent entries
//! for one membership are serialized while other memberships proceed. The
//! row's `sequence` is bumped under that same lock and orders the history;
//! transaction ids are allocated earlier and do not.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use guild_core::entities::{BalanceTransaction, LedgerEntry};
use guild_core::traits::{LedgerRepository, RepoResult, TransactionQuery};
use guild_core::value_objects::Snowflake;

use crate::models::TransactionModel;

use super::error::{map_db_error, membership_not_found};

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new PgLedgerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Apply one entry on an open transaction
///
/// Shared with the sale repository, which settles draws on its own
/// transaction.
pub(crate) async fn apply_entry(
    conn: &mut PgConnection,
    entry: &LedgerEntry,
) -> RepoResult<BalanceTransaction> {
    let (balance_after, sequence) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        UPDATE memberships
        SET balance = balance + $2, ledger_seq = ledger_seq + 1, updated_at = NOW()
        WHERE id = $1
        RETURNING balance, ledger_seq
        "#,
    )
    .bind(entry.membership_id.into_inner())
    .bind(entry.amount)
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?
    .ok_or_else(membership_not_found)?;

    let model = sqlx::query_as::<_, TransactionModel>(
        r#"
        INSERT INTO balance_transactions
            (id, membership_id, amount, balance_after, sequence, reason, performed_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, clock_timestamp())
        RETURNING id, membership_id, amount, balance_after, sequence, reason, performed_by, created_at
        "#,
    )
    .bind(entry.id.into_inner())
    .bind(entry.membership_id.into_inner())
    .bind(entry.amount)
    .bind(balance_after)
    .bind(sequence)
    .bind(entry.reason.as_deref())
    .bind(entry.performed_by.into_inner())
    .fetch_one(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(model.into())
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    async fn apply(&self, entries: &[LedgerEntry]) -> RepoResult<Vec<BalanceTransaction>> {
        // Lock memberships in id order so concurrent batches cannot deadlock
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by_key(|&i| entries[i].membership_id);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut applied: Vec<Option<BalanceTransaction>> = vec![None; entries.len()];
        for i in order {
            applied[i] = Some(apply_entry(&mut tx, &entries[i]).await?);
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(applied.into_iter().flatten().collect())
    }

    #[instrument(skip(self))]
    async fn find_by_membership(
        &self,
        membership_id: Snowflake,
        query: TransactionQuery,
    ) -> RepoResult<Vec<BalanceTransaction>> {
        let limit = query.limit.clamp(1, 100);

        let results = match query.before {
            Some(before) => {
                sqlx::query_as::<_, TransactionModel>(
                    r#"
                    SELECT id, membership_id, amount, balance_after, sequence, reason, performed_by, created_at
                    FROM balance_transactions
                    WHERE membership_id = $1
                      AND sequence < (
                          SELECT sequence FROM balance_transactions
                          WHERE id = $2 AND membership_id = $1
                      )
                    ORDER BY sequence DESC
                    LIMIT $3
                    "#,
                )
                .bind(membership_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, TransactionModel>(
                    r#"
                    SELECT id, membership_id, amount, balance_after, sequence, reason, performed_by, created_at
                    FROM balance_transactions
                    WHERE membership_id = $1
                    ORDER BY sequence DESC
                    LIMIT $2
                    "#,
                )
                .bind(membership_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(BalanceTransaction::from).collect())
    }

    #[instrument(skip(self))]
    async fn count_since(
        &self,
        membership_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM balance_transactions
            WHERE membership_id = $1
              AND ($2::timestamptz IS NULL OR created_at > $2)
            "#,
        )
        .bind(membership_id.into_inner())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgLedgerRepository>();
    }
}
