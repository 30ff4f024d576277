//! PostgreSQL implementation of BidRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use guild_core::entities::{LootTabBid, LootTabSale};
use guild_core::error::DomainError;
use guild_core::traits::{BidRepository, RepoResult};
use guild_core::value_objects::Snowflake;

use crate::models::{BidModel, SaleModel};

use super::error::{map_db_error, sale_not_found};
use super::sale::lock_sale;

/// PostgreSQL implementation of BidRepository
#[derive(Clone)]
pub struct PgBidRepository {
    pool: PgPool,
}

impl PgBidRepository {
    /// Create a new PgBidRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BidRepository for PgBidRepository {
    #[instrument(skip(self))]
    async fn find_by_sale(&self, sale_id: Snowflake) -> RepoResult<Vec<LootTabBid>> {
        let results = sqlx::query_as::<_, BidModel>(
            r#"
            SELECT id, sale_id, user_id, amount, created_at
            FROM loot_tab_bids
            WHERE sale_id = $1
            ORDER BY id
            "#,
        )
        .bind(sale_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LootTabBid::from).collect())
    }

    #[instrument(skip(self, bid), fields(sale_id = %bid.sale_id, user_id = %bid.user_id, amount = bid.amount))]
    async fn place(&self, bid: &LootTabBid, now: DateTime<Utc>) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // FOR SHARE blocks while a draw holds the row and then sees its result
        let sale: LootTabSale = sqlx::query_as::<_, SaleModel>(
            r#"
            SELECT id, guild_id, created_by, price, duration_hours, expires_at, description,
                   repair_cost, silver_bags, status, winner_id, split_completed, created_at, closed_at
            FROM loot_tab_sales
            WHERE id = $1
            FOR SHARE
            "#,
        )
        .bind(bid.sale_id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or_else(|| sale_not_found(bid.sale_id))?
        .try_into()?;

        sale.check_bid(bid.amount, now)?;

        sqlx::query(
            r#"
            INSERT INTO loot_tab_bids (id, sale_id, user_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(bid.id.into_inner())
        .bind(bid.sale_id.into_inner())
        .bind(bid.user_id.into_inner())
        .bind(bid.amount)
        .bind(bid.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, sale_id: Snowflake, bid_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let sale = lock_sale(&mut tx, sale_id).await?;
        sale.ensure_participants_mutable()?;

        let result = sqlx::query(
            r#"
            DELETE FROM loot_tab_bids WHERE id = $1 AND sale_id = $2
            "#,
        )
        .bind(bid_id.into_inner())
        .bind(sale_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BidNotFound(bid_id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
