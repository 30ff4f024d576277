//! API Integration Tests
//!
//! Each test spawns the full HTTP stack over the in-memory store.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::collections::HashMap;

use futures::future::join_all;
use guild_core::entities::{MemberRole, MemberStatus, SaleStatus};
use guild_core::{SettlementPolicy, Snowflake};
use guild_service::dto::{
    BalanceAdjustmentResponse, BalanceResponse, BidResponse, DrawResponse, HealthResponse,
    LootSplitResponse, PaginatedResponse, ReadinessResponse, SaleDetailsResponse, SaleResponse,
    TransactionResponse,
};
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestMember, TestServer,
};
use reqwest::StatusCode;

async fn open_sale(server: &TestServer, officer: &TestMember, request: &CreateSale) -> SaleResponse {
    let response = server
        .post_auth(&server.guild_path("/loot-sales"), &officer.token, request)
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn bid(server: &TestServer, sale: &SaleResponse, bidder: &TestMember, amount: i64) -> BidResponse {
    let response = server
        .post_auth(
            &format!("/api/v1/loot-sales/{}/bids", sale.id),
            &bidder.token,
            &PlaceBid { amount },
        )
        .await
        .unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn own_balance(server: &TestServer, member: &TestMember) -> BalanceResponse {
    let response = server
        .get_auth(&server.guild_path("/balance/@me"), &member.token)
        .await
        .unwrap();
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");

    let health: HealthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_health_ready_on_memory_store() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");

    let ready: ReadinessResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(ready.checks.database, "in_memory");
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get(&server.guild_path("/balance/@me")).await.unwrap();

    assert_error(response, StatusCode::UNAUTHORIZED, "MISSING_AUTH")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_invalid_and_expired_tokens() {
    let server = TestServer::start().await.expect("Failed to start server");
    let member = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path("/balance/@me");

    let response = server.get_auth(&path, "not-a-jwt").await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        .await
        .unwrap();

    let expired = server.expired_token_for(member.user_id()).unwrap();
    let response = server.get_auth(&path, &expired).await.unwrap();
    assert_error(response, StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let server = TestServer::start().await.expect("Failed to start server");
    let stranger = server.token_for(Snowflake::new(424_242)).unwrap();

    let response = server
        .get_auth(&server.guild_path("/balance/@me"), &stranger)
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "NOT_GUILD_MEMBER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_malformed_path_id_is_bad_request() {
    let server = TestServer::start().await.expect("Failed to start server");
    let member = server.member(MemberRole::Player).await.unwrap();

    let response = server
        .get_auth("/api/v1/loot-sales/not-a-number", &member.token)
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

// ============================================================================
// Ledger Tests
// ============================================================================

#[tokio::test]
async fn test_adjust_balance_and_read_history() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path(&format!("/members/{}/balance", player.user_id()));

    for amount in [100, -30, 45] {
        let response = server
            .post_auth(&path, &officer.token, &AdjustBalance::new(amount, "regear"))
            .await
            .unwrap();
        let _: BalanceAdjustmentResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    }

    let balance = own_balance(&server, &player).await;
    assert_eq!(balance.balance, 115);
    assert_eq!(balance.unseen_transactions, 3);

    let response = server
        .get_auth(&server.guild_path("/members/@me/transactions"), &player.token)
        .await
        .unwrap();
    let history: PaginatedResponse<TransactionResponse> =
        assert_json(response, StatusCode::OK).await.unwrap();

    // Newest first
    let balances: Vec<i64> = history.data.iter().map(|t| t.balance_after).collect();
    assert_eq!(balances, vec![115, 70, 100]);
    assert!(!history.pagination.has_more);
}

#[tokio::test]
async fn test_history_pagination_cursor() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path(&format!("/members/{}/balance", player.user_id()));

    for amount in 1..=5 {
        let response = server
            .post_auth(&path, &officer.token, &AdjustBalance::new(amount, "fame farm"))
            .await
            .unwrap();
        assert_status(response, StatusCode::CREATED).await.unwrap();
    }

    let history_path = server.guild_path(&format!("/members/{}/transactions", player.user_id()));
    let mut query = HashMap::new();
    query.insert("limit", "3".to_string());

    let response = server
        .get_auth_query(&history_path, &officer.token, &query)
        .await
        .unwrap();
    let first: PaginatedResponse<TransactionResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(first.data.len(), 3);
    assert!(first.pagination.has_more);

    query.insert("before", first.pagination.before.clone().unwrap());
    let response = server
        .get_auth_query(&history_path, &officer.token, &query)
        .await
        .unwrap();
    let second: PaginatedResponse<TransactionResponse> = assert_json(response, StatusCode::OK).await.unwrap();

    let amounts: Vec<i64> = second.data.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![2, 1]);
}

#[tokio::test]
async fn test_player_cannot_read_other_history() {
    let server = TestServer::start().await.expect("Failed to start server");
    let player = server.member(MemberRole::Player).await.unwrap();
    let other = server.member(MemberRole::Player).await.unwrap();

    let response = server
        .get_auth(
            &server.guild_path(&format!("/members/{}/transactions", other.user_id())),
            &player.token,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_adjustment_validation() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path(&format!("/members/{}/balance", player.user_id()));

    let response = server
        .post_auth(&path, &officer.token, &AdjustBalance::new(0, "nothing"))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "ZERO_AMOUNT")
        .await
        .unwrap();

    let too_long = AdjustBalance::new(10, &"x".repeat(501));
    let response = server.post_auth(&path, &officer.token, &too_long).await.unwrap();
    let error = assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
    assert!(error["details"]["reason"].is_array());

    let response = server
        .post_auth(&path, &player.token, &AdjustBalance::new(10, "self-service"))
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_malformed_json_body() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();

    let response = server
        .post_auth(
            &server.guild_path("/loot-sales"),
            &officer.token,
            &serde_json::json!({ "price": "lots" }),
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_split_loot() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let mut participants = Vec::new();
    for _ in 0..3 {
        participants.push(server.member(MemberRole::Player).await.unwrap());
    }

    let request = SplitLoot {
        total: 1000,
        participants: participants.iter().map(|m| m.user_id().to_string()).collect(),
        reason: Some("Avalonian dungeon".to_string()),
    };
    let response = server
        .post_auth(&server.guild_path("/loot-splits"), &officer.token, &request)
        .await
        .unwrap();
    let split: LootSplitResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(split.share, 333);
    assert_eq!(split.remainder, 1);
    assert_eq!(split.transactions.len(), 3);
    for member in &participants {
        assert_eq!(own_balance(&server, member).await.balance, 333);
    }
}

#[tokio::test]
async fn test_split_loot_unknown_participant_changes_nothing() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let request = SplitLoot {
        total: 500,
        participants: vec![player.user_id().to_string(), "987654321".to_string()],
        reason: None,
    };
    let response = server
        .post_auth(&server.guild_path("/loot-splits"), &officer.token, &request)
        .await
        .unwrap();
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND")
        .await
        .unwrap();

    assert_eq!(own_balance(&server, &player).await.balance, 0);
}

#[tokio::test]
async fn test_acknowledge_resets_unseen_count() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path(&format!("/members/{}/balance", player.user_id()));

    let response = server
        .post_auth(&path, &officer.token, &AdjustBalance::new(50, "payout"))
        .await
        .unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(own_balance(&server, &player).await.unseen_transactions, 1);

    let response = server
        .post_empty_auth(&server.guild_path("/balance/@me/ack"), &player.token)
        .await
        .unwrap();
    let acked: BalanceResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(acked.unseen_transactions, 0);
    assert!(acked.last_seen_balance_at.is_some());
}

// ============================================================================
// Loot Sale Tests
// ============================================================================

#[tokio::test]
async fn test_sale_lifecycle_with_tie_break() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let a = server.member(MemberRole::Player).await.unwrap();
    let b = server.member(MemberRole::Player).await.unwrap();
    let c = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    assert_eq!(sale.status, SaleStatus::Open);
    assert_eq!(sale.expires_at - sale.created_at, chrono::Duration::hours(24));

    bid(&server, &sale, &a, 100).await;
    bid(&server, &sale, &b, 150).await;
    bid(&server, &sale, &c, 150).await;

    let response = server
        .get_auth(&format!("/api/v1/loot-sales/{}", sale.id), &a.token)
        .await
        .unwrap();
    let details: SaleDetailsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(details.bids.len(), 3);
    assert_eq!(details.standings[0].user_id, b.user_id().to_string());

    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/draw", sale.id), &officer.token)
        .await
        .unwrap();
    let draw: DrawResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(draw.outcome, SaleStatus::Drawn);
    assert_eq!(draw.sale.winner_id, Some(b.user_id().to_string()));
    let transaction = draw.transaction.unwrap();
    assert_eq!(transaction.amount, -150);
    assert_eq!(transaction.reason.as_deref(), Some("Loot tab sale: T8 loot tab"));

    assert_eq!(own_balance(&server, &b).await.balance, -150);
    assert_eq!(own_balance(&server, &a).await.balance, 0);
    assert_eq!(own_balance(&server, &c).await.balance, 0);
}

#[tokio::test]
async fn test_second_draw_conflicts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    bid(&server, &sale, &player, 120).await;

    let draw_path = format!("/api/v1/loot-sales/{}/draw", sale.id);
    let response = server.post_empty_auth(&draw_path, &officer.token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post_empty_auth(&draw_path, &officer.token).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "SALE_NOT_OPEN")
        .await
        .unwrap();

    assert_eq!(own_balance(&server, &player).await.balance, -120);
}

#[tokio::test]
async fn test_concurrent_draws_settle_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    bid(&server, &sale, &player, 100).await;

    let draw_path = format!("/api/v1/loot-sales/{}/draw", sale.id);
    let responses = join_all((0..8).map(|_| server.post_empty_auth(&draw_path, &officer.token))).await;

    let statuses: Vec<StatusCode> = responses.into_iter().map(|r| r.unwrap().status()).collect();
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::OK || *s == StatusCode::CONFLICT));

    assert_eq!(own_balance(&server, &player).await.balance, -100);
}

#[tokio::test]
async fn test_draw_without_bids_cancels() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/draw", sale.id), &officer.token)
        .await
        .unwrap();
    let draw: DrawResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(draw.outcome, SaleStatus::Cancelled);
    assert!(draw.winning_bid.is_none());
    assert!(draw.transaction.is_none());
}

#[tokio::test]
async fn test_failed_settlement_is_retryable() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    bid(&server, &sale, &player, 100).await;
    assert!(server.store.remove_membership(server.guild_id, player.user_id()));

    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/draw", sale.id), &officer.token)
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::INTERNAL_SERVER_ERROR, "SETTLEMENT_FAILED")
        .await
        .unwrap();
    assert_eq!(error["details"]["retryable"], true);

    let response = server
        .get_auth(&format!("/api/v1/loot-sales/{}", sale.id), &officer.token)
        .await
        .unwrap();
    let details: SaleDetailsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(details.sale.status, SaleStatus::Open);
}

#[tokio::test]
async fn test_net_of_costs_settlement() {
    let server = TestServer::start_with_policy(SettlementPolicy::NetOfCosts)
        .await
        .expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(1000).with_costs(100, 50)).await;
    bid(&server, &sale, &player, 1200).await;

    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/draw", sale.id), &officer.token)
        .await
        .unwrap();
    let draw: DrawResponse = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(draw.transaction.unwrap().amount, -1050);
    assert_eq!(own_balance(&server, &player).await.balance, -1050);
}

#[tokio::test]
async fn test_bid_rules() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let suspended = server
        .member_with_status(MemberRole::Player, MemberStatus::Suspended)
        .await
        .unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    let bid_path = format!("/api/v1/loot-sales/{}/bids", sale.id);

    let response = server
        .post_auth(&bid_path, &player.token, &PlaceBid { amount: 99 })
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "BID_BELOW_PRICE")
        .await
        .unwrap();

    let response = server
        .post_auth(&bid_path, &suspended.token, &PlaceBid { amount: 100 })
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "MEMBERSHIP_INACTIVE")
        .await
        .unwrap();

    let response = server
        .post_auth("/api/v1/loot-sales/123456/bids", &player.token, &PlaceBid { amount: 100 })
        .await
        .unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/cancel", sale.id), &officer.token)
        .await
        .unwrap();
    let cancelled: SaleResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(cancelled.status, SaleStatus::Cancelled);

    let response = server
        .post_auth(&bid_path, &player.token, &PlaceBid { amount: 100 })
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "SALE_NOT_OPEN")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_sale_rules() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();
    let path = server.guild_path("/loot-sales");

    let response = server
        .post_auth(&path, &player.token, &CreateSale::t8(100))
        .await
        .unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE")
        .await
        .unwrap();

    let response = server
        .post_auth(&path, &officer.token, &CreateSale::t8(100).with_costs(60, 40))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_COSTS")
        .await
        .unwrap();

    let mut too_long = CreateSale::t8(100);
    too_long.duration_hours = 169;
    let response = server.post_auth(&path, &officer.token, &too_long).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_remove_participant() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    let placed = bid(&server, &sale, &player, 100).await;
    let bid_path = format!("/api/v1/loot-sales/{}/bids/{}", sale.id, placed.id);

    let response = server.delete_auth(&bid_path, &player.token).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "INSUFFICIENT_ROLE")
        .await
        .unwrap();

    let response = server.delete_auth(&bid_path, &officer.token).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server
        .get_auth(&format!("/api/v1/loot-sales/{}", sale.id), &officer.token)
        .await
        .unwrap();
    let details: SaleDetailsResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(details.bids.is_empty());
}

#[tokio::test]
async fn test_remove_participant_after_draw_conflicts() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();
    let player = server.member(MemberRole::Player).await.unwrap();

    let sale = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    let placed = bid(&server, &sale, &player, 100).await;

    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/draw", sale.id), &officer.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server
        .delete_auth(
            &format!("/api/v1/loot-sales/{}/bids/{}", sale.id, placed.id),
            &officer.token,
        )
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "SPLIT_COMPLETED")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_sales_by_status() {
    let server = TestServer::start().await.expect("Failed to start server");
    let officer = server.member(MemberRole::Officer).await.unwrap();

    let open = open_sale(&server, &officer, &CreateSale::t8(100)).await;
    let closed = open_sale(&server, &officer, &CreateSale::t8(200)).await;
    let response = server
        .post_empty_auth(&format!("/api/v1/loot-sales/{}/cancel", closed.id), &officer.token)
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let path = server.guild_path("/loot-sales");
    let mut query = HashMap::new();
    query.insert("status", "open".to_string());
    let response = server.get_auth_query(&path, &officer.token, &query).await.unwrap();
    let sales: Vec<SaleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].id, open.id);

    let response = server.get_auth(&path, &officer.token).await.unwrap();
    let all: Vec<SaleResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(all.len(), 2);

    query.insert("status", "sold".to_string());
    let response = server.get_auth_query(&path, &officer.token, &query).await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}
