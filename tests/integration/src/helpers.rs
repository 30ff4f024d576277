//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, issuing tokens, seeding
//! memberships and making HTTP requests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use guild_api::{create_app, AppState};
use guild_common::{AppConfig, JwtService};
use guild_core::entities::{MemberRole, MemberStatus, Membership};
use guild_core::traits::MembershipRepository;
use guild_core::{SettlementPolicy, Snowflake, SnowflakeGenerator};
use guild_db::MemoryStore;
use guild_service::ServiceContextBuilder;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Secret shared by the test server and the tokens issued by tests
pub const TEST_JWT_SECRET: &str = "integration-test-secret-that-is-long-enough";

/// Token lifetime for test users
const TOKEN_TTL_SECS: i64 = 900;

/// A seeded guild member with a bearer token
#[derive(Debug, Clone)]
pub struct TestMember {
    pub membership: Membership,
    pub token: String,
}

impl TestMember {
    pub fn user_id(&self) -> Snowflake {
        self.membership.user_id
    }
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: MemoryStore,
    pub guild_id: Snowflake,
    jwt: JwtService,
    ids: Arc<SnowflakeGenerator>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_policy(SettlementPolicy::WinningBid).await
    }

    /// Start a test server settling draws with `policy`
    pub async fn start_with_policy(policy: SettlementPolicy) -> Result<Self> {
        let config = test_config()?;
        let store = MemoryStore::new();
        let ids = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

        let service_context = ServiceContextBuilder::new()
            .memory_store(store.clone())
            .snowflake_generator(Arc::clone(&ids))
            .settlement_policy(policy)
            .build()?;
        let app = create_app(AppState::new(service_context, config));

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        let guild_id = ids.generate();

        Ok(Self {
            addr,
            client,
            store,
            guild_id,
            jwt: JwtService::new(TEST_JWT_SECRET),
            ids,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Issue a bearer token for any user id
    pub fn token_for(&self, user_id: Snowflake) -> Result<String> {
        Ok(self.jwt.issue(user_id, TOKEN_TTL_SECS)?)
    }

    /// Issue a token that expired well outside the verifier's leeway
    pub fn expired_token_for(&self, user_id: Snowflake) -> Result<String> {
        Ok(self.jwt.issue(user_id, -600)?)
    }

    /// Seed an active membership in the server's guild
    pub async fn member(&self, role: MemberRole) -> Result<TestMember> {
        self.member_with_status(role, MemberStatus::Active).await
    }

    pub async fn member_with_status(&self, role: MemberRole, status: MemberStatus) -> Result<TestMember> {
        let membership =
            Membership::new(self.ids.generate(), self.guild_id, self.ids.generate(), role).with_status(status);
        self.store.create(&membership).await?;

        Ok(TestMember {
            token: self.token_for(membership.user_id)?,
            membership,
        })
    }

    /// Path under `/api/v1/guilds/{guild_id}`
    pub fn guild_path(&self, suffix: &str) -> String {
        format!("/api/v1/guilds/{}{suffix}", self.guild_id)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).bearer_auth(token).send().await?)
    }

    /// Make a GET request with auth token and query parameters
    pub async fn get_auth_query(
        &self,
        path: &str,
        token: &str,
        query: &HashMap<&str, String>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request with auth token
    pub async fn post_auth<T: Serialize>(&self, path: &str, token: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a POST request with auth token and no body
    pub async fn post_empty_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).bearer_auth(token).send().await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).bearer_auth(token).send().await?)
    }
}

/// Configuration for the test server
///
/// Built from fixed values so a `DATABASE_URL` in the developer's environment
/// never points tests at a real database.
pub fn test_config() -> Result<AppConfig> {
    let vars: HashMap<&str, &str> = [
        ("APP_ENV", "development"),
        ("API_PORT", "0"),
        ("JWT_SECRET", TEST_JWT_SECRET),
        ("WORKER_ID", "3"),
    ]
    .into_iter()
    .collect();

    AppConfig::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Assert an error response and return its `error` object
///
/// Every error body has the shape `{"error": {"code", "message", "details"?}}`.
pub async fn assert_error(response: Response, expected_status: StatusCode, expected_code: &str) -> Result<Value> {
    let body: Value = assert_json(response, expected_status).await?;
    let error = body
        .get("error")
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Missing error object in {body}"))?;

    anyhow::ensure!(
        error["code"] == expected_code,
        "Expected error code {expected_code}, got {}",
        error["code"]
    );
    anyhow::ensure!(error["message"].is_string(), "Missing error message in {error}");
    Ok(error)
}
