//! Auction service
//!
//! Loot-tab sale lifecycle: open, bid, remove participants, draw, cancel.
//! State transitions are decided inside the repositories; this layer resolves
//! the caller's membership and role before delegating.

use chrono::{DateTime, Utc};
use guild_core::entities::{LootTabBid, LootTabSale, MemberRole, NewSale, SaleStatus};
use guild_core::traits::{DrawOutcome, DrawRequest};
use guild_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::{
    BidResponse, CreateSaleRequest, DrawResponse, PlaceBidRequest, SaleDetailsResponse,
    SaleResponse, SaleWithBids,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Actor recorded on settlements performed by the sweep
pub const SYSTEM_ACTOR: Snowflake = Snowflake::new(0);

/// Auction service
pub struct AuctionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuctionService<'a> {
    /// Create a new AuctionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Open a sale; `expires_at` is now plus `duration_hours`
    #[instrument(skip(self, request))]
    pub async fn create_sale(
        &self,
        guild_id: Snowflake,
        actor_id: Snowflake,
        request: CreateSaleRequest,
    ) -> ServiceResult<SaleResponse> {
        PermissionService::new(self.ctx)
            .require_role(guild_id, actor_id, MemberRole::Officer)
            .await?;

        let sale = LootTabSale::open(
            self.ctx.generate_id(),
            NewSale {
                guild_id,
                created_by: actor_id,
                price: request.price,
                duration_hours: request.duration_hours,
                description: request.description,
                repair_cost: request.repair_cost,
                silver_bags: request.silver_bags,
            },
            Utc::now(),
        )?;

        self.ctx.sale_repo().create(&sale).await?;

        info!(
            sale_id = %sale.id,
            guild_id = %guild_id,
            price = sale.price,
            expires_at = %sale.expires_at,
            "Sale created"
        );

        Ok(SaleResponse::from(sale))
    }

    /// Bid on an open sale as an active member of its guild
    #[instrument(skip(self, request), fields(amount = request.amount))]
    pub async fn place_bid(
        &self,
        sale_id: Snowflake,
        user_id: Snowflake,
        request: PlaceBidRequest,
    ) -> ServiceResult<BidResponse> {
        let sale = self.find_sale(sale_id).await?;
        PermissionService::new(self.ctx)
            .require_member(sale.guild_id, user_id)
            .await?;

        let bid = LootTabBid::new(self.ctx.generate_id(), sale_id, user_id, request.amount);
        // Fail fast; the repository re-checks under the sale lock
        sale.check_bid(bid.amount, bid.created_at)?;
        self.ctx.bid_repo().place(&bid, bid.created_at).await?;

        info!(sale_id = %sale_id, bid_id = %bid.id, user_id = %user_id, "Bid placed");

        Ok(BidResponse::from(bid))
    }

    /// Remove a bid from a sale that has not been settled
    #[instrument(skip(self))]
    pub async fn remove_participant(
        &self,
        sale_id: Snowflake,
        actor_id: Snowflake,
        bid_id: Snowflake,
    ) -> ServiceResult<()> {
        let sale = self.find_sale(sale_id).await?;
        PermissionService::new(self.ctx)
            .require_role(sale.guild_id, actor_id, MemberRole::Officer)
            .await?;

        self.ctx.bid_repo().delete(sale_id, bid_id).await?;

        info!(sale_id = %sale_id, bid_id = %bid_id, "Participant removed");
        Ok(())
    }

    /// Officer-initiated draw
    #[instrument(skip(self))]
    pub async fn draw_winner(&self, sale_id: Snowflake, actor_id: Snowflake) -> ServiceResult<DrawResponse> {
        let sale = self.find_sale(sale_id).await?;
        PermissionService::new(self.ctx)
            .require_role(sale.guild_id, actor_id, MemberRole::Officer)
            .await?;

        let outcome = self.draw(sale_id, actor_id, Utc::now()).await?;
        Ok(DrawResponse::from(outcome))
    }

    /// Draw on behalf of the sweep; no membership is required
    pub(crate) async fn draw_as_system(
        &self,
        sale_id: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<DrawOutcome> {
        self.draw(sale_id, SYSTEM_ACTOR, now).await
    }

    /// Close the sale, pick the winner and settle in one storage transaction
    ///
    /// At most one caller succeeds; the others see `SaleNotOpen`.
    async fn draw(
        &self,
        sale_id: Snowflake,
        performed_by: Snowflake,
        now: DateTime<Utc>,
    ) -> ServiceResult<DrawOutcome> {
        let outcome = self
            .ctx
            .sale_repo()
            .draw(DrawRequest {
                sale_id,
                transaction_id: self.ctx.generate_id(),
                performed_by,
                policy: self.ctx.settlement_policy(),
                now,
            })
            .await?;

        match &outcome {
            DrawOutcome::Drawn {
                winning_bid,
                transaction,
                ..
            } => info!(
                sale_id = %sale_id,
                winner_id = %winning_bid.user_id,
                amount = transaction.amount,
                "Sale drawn"
            ),
            DrawOutcome::Cancelled { .. } => info!(sale_id = %sale_id, "Sale cancelled without bids"),
        }

        Ok(outcome)
    }

    /// Cancel an open sale without settling it
    #[instrument(skip(self))]
    pub async fn cancel_sale(&self, sale_id: Snowflake, actor_id: Snowflake) -> ServiceResult<SaleResponse> {
        let sale = self.find_sale(sale_id).await?;
        PermissionService::new(self.ctx)
            .require_role(sale.guild_id, actor_id, MemberRole::Officer)
            .await?;

        let sale = self.ctx.sale_repo().cancel(sale_id, Utc::now()).await?;

        info!(sale_id = %sale_id, "Sale cancelled");
        Ok(SaleResponse::from(sale))
    }

    /// Sale with its bids, visible to members of its guild
    #[instrument(skip(self))]
    pub async fn get_sale(&self, sale_id: Snowflake, user_id: Snowflake) -> ServiceResult<SaleDetailsResponse> {
        let sale = self.find_sale(sale_id).await?;
        PermissionService::new(self.ctx)
            .membership(sale.guild_id, user_id)
            .await?;

        let bids = self.ctx.bid_repo().find_by_sale(sale_id).await?;
        Ok(SaleDetailsResponse::from(SaleWithBids { sale, bids }))
    }

    /// A guild's sales, newest first, optionally filtered by status
    #[instrument(skip(self))]
    pub async fn list_sales(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        status: Option<&str>,
    ) -> ServiceResult<Vec<SaleResponse>> {
        PermissionService::new(self.ctx)
            .membership(guild_id, user_id)
            .await?;

        let status = status
            .map(|s| {
                s.trim()
                    .to_uppercase()
                    .parse::<SaleStatus>()
                    .map_err(|_| ServiceError::validation(format!("Unknown sale status: {s}")))
            })
            .transpose()?;

        let sales = self.ctx.sale_repo().find_by_guild(guild_id, status).await?;
        Ok(sales.iter().map(SaleResponse::from).collect())
    }

    async fn find_sale(&self, sale_id: Snowflake) -> ServiceResult<LootTabSale> {
        self.ctx
            .sale_repo()
            .find_by_id(sale_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id.to_string()))
    }
}
