//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{balances, health, loot_sales};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(balance_routes())
        .merge(guild_sale_routes())
        .merge(sale_routes())
}

/// Balance and ledger routes
fn balance_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/balance/@me", get(balances::get_own_balance))
        .route(
            "/guilds/:guild_id/balance/@me/ack",
            post(balances::acknowledge_balance),
        )
        .route(
            "/guilds/:guild_id/members/:user_id/balance",
            post(balances::adjust_balance),
        )
        .route(
            "/guilds/:guild_id/members/:user_id/transactions",
            get(balances::get_transactions),
        )
        .route("/guilds/:guild_id/loot-splits", post(balances::split_loot))
}

/// Sales scoped to a guild
fn guild_sale_routes() -> Router<AppState> {
    Router::new()
        .route("/guilds/:guild_id/loot-sales", get(loot_sales::list_sales))
        .route("/guilds/:guild_id/loot-sales", post(loot_sales::create_sale))
}

/// Routes addressed by sale id
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/loot-sales/:sale_id", get(loot_sales::get_sale))
        .route("/loot-sales/:sale_id/bids", post(loot_sales::place_bid))
        .route(
            "/loot-sales/:sale_id/bids/:bid_id",
            delete(loot_sales::remove_participant),
        )
        .route("/loot-sales/:sale_id/draw", post(loot_sales::draw_winner))
        .route("/loot-sales/:sale_id/cancel", post(loot_sales::cancel_sale))
}
