//! Balance and ledger handlers
//!
//! Endpoints for balances, transaction history, adjustments and loot splits.

use axum::{
    extract::{Path, State},
    Json,
};
use guild_service::dto::{
    AdjustBalanceRequest, BalanceAdjustmentResponse, BalanceResponse, LootSplitResponse,
    PaginatedResponse, SplitLootRequest, TransactionResponse,
};
use guild_service::LedgerService;

use crate::extractors::{AuthUser, GuildIdPath, GuildMemberPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Get own balance with the unseen transaction count
///
/// GET /guilds/{guild_id}/balance/@me
pub async fn get_own_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<BalanceResponse>> {
    let service = LedgerService::new(state.service_context());
    let response = service.balance(path.guild_id()?, auth.user_id).await?;
    Ok(Json(response))
}

/// Mark all current transactions as seen
///
/// POST /guilds/{guild_id}/balance/@me/ack
pub async fn acknowledge_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
) -> ApiResult<Json<BalanceResponse>> {
    let service = LedgerService::new(state.service_context());
    let response = service
        .acknowledge_balance(path.guild_id()?, auth.user_id)
        .await?;
    Ok(Json(response))
}

/// Transaction history of a member, newest first
///
/// GET /guilds/{guild_id}/members/{user_id}/transactions
pub async fn get_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildMemberPath>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<TransactionResponse>>> {
    let service = LedgerService::new(state.service_context());
    let response = service
        .history(
            path.guild_id()?,
            auth.user_id,
            path.user_id(auth.user_id)?,
            pagination.before,
            pagination.limit,
        )
        .await?;
    Ok(Json(response))
}

/// Adjust a member's balance
///
/// POST /guilds/{guild_id}/members/{user_id}/balance
pub async fn adjust_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildMemberPath>,
    ValidatedJson(request): ValidatedJson<AdjustBalanceRequest>,
) -> ApiResult<Created<Json<BalanceAdjustmentResponse>>> {
    let service = LedgerService::new(state.service_context());
    let response = service
        .adjust_balance_as(
            path.guild_id()?,
            auth.user_id,
            path.user_id(auth.user_id)?,
            request,
        )
        .await?;
    Ok(Created(Json(response)))
}

/// Split a loot total evenly among participants
///
/// POST /guilds/{guild_id}/loot-splits
pub async fn split_loot(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<GuildIdPath>,
    ValidatedJson(request): ValidatedJson<SplitLootRequest>,
) -> ApiResult<Created<Json<LootSplitResponse>>> {
    let service = LedgerService::new(state.service_context());
    let response = service
        .split_loot(path.guild_id()?, auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}
