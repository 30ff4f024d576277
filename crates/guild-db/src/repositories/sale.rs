//! PostgreSQL implementation of SaleRepository
//!
//! Terminal transitions use `WHERE status = 'OPEN'` guards; the draw also
//! holds the sale row lock for the whole selection and settlement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use guild_core::auction::select_winner;
use guild_core::entities::{
    BalanceTransaction, LedgerEntry, LootTabBid, LootTabSale, SaleStatus,
};
use guild_core::error::DomainError;
use guild_core::traits::{DrawOutcome, DrawRequest, RepoResult, SaleRepository};
use guild_core::value_objects::Snowflake;

use crate::mappers::SaleInsert;
use crate::models::{BidModel, SaleModel};

use super::error::{into_settlement_failure, map_db_error, map_unique_violation, sale_not_found};
use super::ledger::apply_entry;

/// PostgreSQL implementation of SaleRepository
#[derive(Clone)]
pub struct PgSaleRepository {
    pool: PgPool,
}

impl PgSaleRepository {
    /// Create a new PgSaleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Load a sale with `FOR UPDATE`, failing if it does not exist
pub(crate) async fn lock_sale(conn: &mut PgConnection, id: Snowflake) -> RepoResult<LootTabSale> {
    sqlx::query_as::<_, SaleModel>(
        r#"
        SELECT id, guild_id, created_by, price, duration_hours, expires_at, description,
               repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
        FROM loot_tab_sales
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| sale_not_found(id))?
    .try_into()
}

/// Error for a guarded transition that matched no row, carrying the status
/// the sale has now
async fn not_open(conn: &mut PgConnection, id: Snowflake) -> DomainError {
    let status = sqlx::query_scalar::<_, String>("SELECT status FROM loot_tab_sales WHERE id = $1")
        .bind(id.into_inner())
        .fetch_optional(&mut *conn)
        .await;

    match status {
        Ok(Some(status)) => match status.parse::<SaleStatus>() {
            Ok(status) => DomainError::SaleNotOpen { status },
            Err(e) => e,
        },
        Ok(None) => sale_not_found(id),
        Err(e) => map_db_error(e),
    }
}

/// Charge the winner; every error here aborts the draw
async fn settle(
    conn: &mut PgConnection,
    sale: &LootTabSale,
    winning_bid: &LootTabBid,
    request: &DrawRequest,
) -> RepoResult<BalanceTransaction> {
    let membership_id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id FROM memberships WHERE guild_id = $1 AND user_id = $2
        "#,
    )
    .bind(sale.guild_id.into_inner())
    .bind(winning_bid.user_id.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?
    .ok_or_else(|| {
        DomainError::SettlementFailed(format!(
            "winner {} has no membership in guild {}",
            winning_bid.user_id, sale.guild_id
        ))
    })?;

    let amount = request.policy.settlement_amount(sale, winning_bid.amount)?;
    let entry = LedgerEntry::new(
        request.transaction_id,
        Snowflake::new(membership_id),
        amount,
        Some(sale.settlement_reason()),
        request.performed_by,
    )?;

    apply_entry(conn, &entry).await
}

#[async_trait]
impl SaleRepository for PgSaleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<LootTabSale>> {
        let result = sqlx::query_as::<_, SaleModel>(
            r#"
            SELECT id, guild_id, created_by, price, duration_hours, expires_at, description,
                   repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
            FROM loot_tab_sales
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(LootTabSale::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_guild(
        &self,
        guild_id: Snowflake,
        status: Option<SaleStatus>,
    ) -> RepoResult<Vec<LootTabSale>> {
        let results = sqlx::query_as::<_, SaleModel>(
            r#"
            SELECT id, guild_id, created_by, price, duration_hours, expires_at, description,
                   repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
            FROM loot_tab_sales
            WHERE guild_id = $1 AND ($2::varchar IS NULL OR status = $2)
            ORDER BY id DESC
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(status.map(SaleStatus::as_str))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(LootTabSale::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_expired_open(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<LootTabSale>> {
        let results = sqlx::query_as::<_, SaleModel>(
            r#"
            SELECT id, guild_id, created_by, price, duration_hours, expires_at, description,
                   repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
            FROM loot_tab_sales
            WHERE status = 'OPEN' AND expires_at <= $1
            ORDER BY last_sweep_failure_at NULLS FIRST, expires_at, id
            LIMIT $2
            "#,
        )
        .bind(now)
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(LootTabSale::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn record_sweep_failure(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE loot_tab_sales
            SET last_sweep_failure_at = $2
            WHERE id = $1 AND status = 'OPEN'
            "#,
        )
        .bind(id.into_inner())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, sale), fields(sale_id = %sale.id, guild_id = %sale.guild_id))]
    async fn create(&self, sale: &LootTabSale) -> RepoResult<()> {
        let insert = SaleInsert::new(sale);

        sqlx::query(
            r#"
            INSERT INTO loot_tab_sales (
                id, guild_id, created_by, price, duration_hours, expires_at, description,
                repair_cost, silver_bags, status, split_completed, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE, $11)
            "#,
        )
        .bind(insert.id)
        .bind(insert.guild_id)
        .bind(insert.created_by)
        .bind(insert.price)
        .bind(insert.duration_hours)
        .bind(sale.expires_at)
        .bind(insert.description)
        .bind(insert.repair_cost)
        .bind(insert.silver_bags)
        .bind(insert.status)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::InternalError(format!("duplicate sale id {}", sale.id))
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn cancel(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<LootTabSale> {
        let mut conn = self.pool.acquire().await.map_err(map_db_error)?;

        let result = sqlx::query_as::<_, SaleModel>(
            r#"
            UPDATE loot_tab_sales
            SET status = 'CANCELLED', closed_at = $2
            WHERE id = $1 AND status = 'OPEN'
            RETURNING id, guild_id, created_by, price, duration_hours, expires_at, description,
                      repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
            "#,
        )
        .bind(id.into_inner())
        .bind(now)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_error)?;

        match result {
            Some(model) => model.try_into(),
            None => Err(not_open(&mut conn, id).await),
        }
    }

    #[instrument(skip(self, request), fields(sale_id = %request.sale_id, policy = %request.policy))]
    async fn draw(&self, request: DrawRequest) -> RepoResult<DrawOutcome> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let mut sale = lock_sale(&mut tx, request.sale_id).await?;
        sale.ensure_open()?;

        let bids: Vec<LootTabBid> = sqlx::query_as::<_, BidModel>(
            r#"
            SELECT id, sale_id, user_id, amount, created_at
            FROM loot_tab_bids
            WHERE sale_id = $1
            ORDER BY id
            "#,
        )
        .bind(sale.id.into_inner())
        .fetch_all(&mut *tx)
        .await
        .map_err(map_db_error)?
        .into_iter()
        .map(LootTabBid::from)
        .collect();

        let Some(winning_bid) = select_winner(&bids).cloned() else {
            let result = sqlx::query(
                r#"
                UPDATE loot_tab_sales
                SET status = 'CANCELLED', closed_at = $2
                WHERE id = $1 AND status = 'OPEN'
                "#,
            )
            .bind(sale.id.into_inner())
            .bind(request.now)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(not_open(&mut tx, sale.id).await);
            }

            tx.commit().await.map_err(map_db_error)?;
            sale.mark_cancelled(request.now);
            return Ok(DrawOutcome::Cancelled { sale });
        };

        let result = sqlx::query(
            r#"
            UPDATE loot_tab_sales
            SET status = 'DRAWN', winner_id = $2, split_completed = TRUE, closed_at = $3
            WHERE id = $1 AND status = 'OPEN'
            "#,
        )
        .bind(sale.id.into_inner())
        .bind(winning_bid.user_id.into_inner())
        .bind(request.now)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(not_open(&mut tx, sale.id).await);
        }

        // Dropping `tx` on error rolls back the transition too
        let transaction = settle(&mut tx, &sale, &winning_bid, &request)
            .await
            .map_err(into_settlement_failure)?;

        tx.commit().await.map_err(map_db_error)?;

        sale.mark_drawn(winning_bid.user_id, request.now);
        Ok(DrawOutcome::Drawn {
            sale,
            winning_bid,
            transaction,
        })
    }
}
