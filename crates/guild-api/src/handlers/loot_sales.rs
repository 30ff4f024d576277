//! Loot-tab sale handlers
//!
//! Endpoints for the sale lifecycle and bidding.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use guild_service::dto::{
    BidResponse, CreateSaleRequest, DrawResponse, ListSalesQuery, PlaceBidRequest,
    SaleDetailsResponse, SaleResponse,
};
use guild_service::AuctionService;

use crate::extractors::{AuthUser, GuildIdPath, SaleBidPath, SaleIdPath, ValidatedJson};
use crate::response::{ApiError, ApiResult, Created, NoContent};
use crate::state::AppState;

/// List a guild's sales
///
/// GET /guilds/{guild_id}/loot-sales?status=OPEN
pub async fn list_sales(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    query: Result<Query<ListSalesQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<SaleResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::invalid_query(e.body_text()))?;

    let service = AuctionService::new(state.service_context());
    let sales = service
        .list_sales(path.guild_id()?, auth.user_id, query.status.as_deref())
        .await?;
    Ok(Json(sales))
}

/// Open a sale
///
/// POST /guilds/{guild_id}/loot-sales
pub async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<CreateSaleRequest>,
) -> ApiResult<Created<Json<SaleResponse>>> {
    let service = AuctionService::new(state.service_context());
    let response = service
        .create_sale(path.guild_id()?, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Get a sale with its bids
///
/// GET /loot-sales/{sale_id}
pub async fn get_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<SaleIdPath>,
) -> ApiResult<Json<SaleDetailsResponse>> {
    let service = AuctionService::new(state.service_context());
    let response = service.get_sale(path.sale_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Bid on a sale
///
/// POST /loot-sales/{sale_id}/bids
pub async fn place_bid(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<SaleIdPath>,
    ValidatedJson(request): ValidatedJson<PlaceBidRequest>,
) -> ApiResult<Created<Json<BidResponse>>> {
    let service = AuctionService::new(state.service_context());
    let response = service
        .place_bid(path.sale_id()?, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Remove a participant's bid
///
/// DELETE /loot-sales/{sale_id}/bids/{bid_id}
pub async fn remove_participant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<SaleBidPath>,
) -> ApiResult<NoContent> {
    let service = AuctionService::new(state.service_context());
    service
        .remove_participant(path.sale_id()?, auth.user_id, path.bid_id()?)
        .await?;
    Ok(NoContent)
}

/// Draw the winner now
///
/// POST /loot-sales/{sale_id}/draw
pub async fn draw_winner(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<SaleIdPath>,
) -> ApiResult<Json<DrawResponse>> {
    let service = AuctionService::new(state.service_context());
    let response = service.draw_winner(path.sale_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Cancel an open sale
///
/// POST /loot-sales/{sale_id}/cancel
pub async fn cancel_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<SaleIdPath>,
) -> ApiResult<Json<SaleResponse>> {
    let service = AuctionService::new(state.service_context());
    let response = service.cancel_sale(path.sale_id()?, auth.user_id).await?;
    Ok(Json(response))
}
