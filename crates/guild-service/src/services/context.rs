//! Service context - dependency container for services
//!
//! Holds the repositories, the ID generator and the auction settings shared
//! by every service.

use std::sync::Arc;

use guild_core::traits::{BidRepository, LedgerRepository, MembershipRepository, SaleRepository};
use guild_core::{SettlementPolicy, Snowflake, SnowflakeGenerator};
use guild_db::{
    MemoryStore, PgBidRepository, PgLedgerRepository, PgMembershipRepository, PgPool,
    PgSaleRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// The repositories are trait objects so the same services run over
/// PostgreSQL in production and over [`MemoryStore`] in tests or when no
/// database is configured.
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent when running on the in-memory store
    pool: Option<PgPool>,

    // Repositories
    membership_repo: Arc<dyn MembershipRepository>,
    ledger_repo: Arc<dyn LedgerRepository>,
    sale_repo: Arc<dyn SaleRepository>,
    bid_repo: Arc<dyn BidRepository>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    settlement_policy: SettlementPolicy,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        pool: Option<PgPool>,
        membership_repo: Arc<dyn MembershipRepository>,
        ledger_repo: Arc<dyn LedgerRepository>,
        sale_repo: Arc<dyn SaleRepository>,
        bid_repo: Arc<dyn BidRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        settlement_policy: SettlementPolicy,
    ) -> Self {
        Self {
            pool,
            membership_repo,
            ledger_repo,
            sale_repo,
            bid_repo,
            snowflake_generator,
            settlement_policy,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if one is configured
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Ping the database; `None` when running without one
    pub async fn database_healthy(&self) -> Option<bool> {
        let pool = self.pool.as_ref()?;
        Some(sqlx::query("SELECT 1").execute(pool).await.is_ok())
    }

    // === Repositories ===

    /// Get the membership repository
    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    /// Get the ledger repository
    pub fn ledger_repo(&self) -> &dyn LedgerRepository {
        self.ledger_repo.as_ref()
    }

    /// Get the sale repository
    pub fn sale_repo(&self) -> &dyn SaleRepository {
        self.sale_repo.as_ref()
    }

    /// Get the bid repository
    pub fn bid_repo(&self) -> &dyn BidRepository {
        self.bid_repo.as_ref()
    }

    // === Settings ===

    /// Policy used to compute the winner's debit when a sale is drawn
    pub fn settlement_policy(&self) -> SettlementPolicy {
        self.settlement_policy
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("settlement_policy", &self.settlement_policy)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    ledger_repo: Option<Arc<dyn LedgerRepository>>,
    sale_repo: Option<Arc<dyn SaleRepository>>,
    bid_repo: Option<Arc<dyn BidRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    settlement_policy: SettlementPolicy,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            pool: None,
            membership_repo: None,
            ledger_repo: None,
            sale_repo: None,
            bid_repo: None,
            snowflake_generator: None,
            settlement_policy: SettlementPolicy::default(),
        }
    }

    /// Wire every repository to PostgreSQL
    pub fn postgres(mut self, pool: PgPool) -> Self {
        self.membership_repo = Some(Arc::new(PgMembershipRepository::new(pool.clone())));
        self.ledger_repo = Some(Arc::new(PgLedgerRepository::new(pool.clone())));
        self.sale_repo = Some(Arc::new(PgSaleRepository::new(pool.clone())));
        self.bid_repo = Some(Arc::new(PgBidRepository::new(pool.clone())));
        self.pool = Some(pool);
        self
    }

    /// Wire every repository to one shared in-memory store
    pub fn memory_store(mut self, store: MemoryStore) -> Self {
        self.membership_repo = Some(Arc::new(store.clone()));
        self.ledger_repo = Some(Arc::new(store.clone()));
        self.sale_repo = Some(Arc::new(store.clone()));
        self.bid_repo = Some(Arc::new(store));
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn ledger_repo(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger_repo = Some(repo);
        self
    }

    pub fn sale_repo(mut self, repo: Arc<dyn SaleRepository>) -> Self {
        self.sale_repo = Some(repo);
        self
    }

    pub fn bid_repo(mut self, repo: Arc<dyn BidRepository>) -> Self {
        self.bid_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn settlement_policy(mut self, policy: SettlementPolicy) -> Self {
        self.settlement_policy = policy;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.membership_repo
                .ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.ledger_repo
                .ok_or_else(|| ServiceError::validation("ledger_repo is required"))?,
            self.sale_repo
                .ok_or_else(|| ServiceError::validation("sale_repo is required"))?,
            self.bid_repo
                .ok_or_else(|| ServiceError::validation("bid_repo is required"))?,
            self.snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
            self.settlement_policy,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_repositories() {
        let err = ServiceContextBuilder::new()
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .build()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("membership_repo is required"));
    }

    #[test]
    fn test_builder_with_memory_store() {
        let ctx = ServiceContextBuilder::new()
            .memory_store(MemoryStore::new())
            .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
            .settlement_policy(SettlementPolicy::NetOfCosts)
            .build()
            .unwrap();
        assert!(ctx.pool().is_none());
        assert_eq!(ctx.settlement_policy(), SettlementPolicy::NetOfCosts);
        assert_ne!(ctx.generate_id(), ctx.generate_id());
    }
}
