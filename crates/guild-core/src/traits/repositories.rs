//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every operation that must be atomic (ledger
//! batches, bid placement, sale transitions) is a single trait method so each
//! backend can run it inside its own transaction or critical section.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::auction::SettlementPolicy;
use crate::entities::{
    BalanceTransaction, LedgerEntry, LootTabBid, LootTabSale, Membership, SaleStatus,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find membership by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Membership>>;

    /// Find the membership of a user in a guild
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>>;

    /// Create a membership; `AlreadyMember` if the (guild, user) pair exists
    async fn create(&self, membership: &Membership) -> RepoResult<()>;

    /// Record that the member has seen their balance up to `at`
    async fn mark_balance_seen(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Ledger Repository
// ============================================================================

/// Cursor pagination for transaction history (newest first)
///
/// `before` names a transaction of the same membership; only rows that were
/// applied ahead of it are returned. An unknown cursor yields an empty page.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub before: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Apply every entry atomically
    ///
    /// Each entry adds its amount to the membership balance and appends one
    /// transaction row carrying the resulting balance. Either all entries are
    /// applied or none; a missing membership yields `MembershipNotFound`.
    /// Transactions are returned in entry order. Each row's `sequence` is
    /// the membership's ledger position, assigned while its balance is locked.
    async fn apply(&self, entries: &[LedgerEntry]) -> RepoResult<Vec<BalanceTransaction>>;

    /// Transactions of a membership, highest sequence first
    async fn find_by_membership(
        &self,
        membership_id: Snowflake,
        query: TransactionQuery,
    ) -> RepoResult<Vec<BalanceTransaction>>;

    /// Number of transactions created after `since` (all when `None`)
    async fn count_since(
        &self,
        membership_id: Snowflake,
        since: Option<DateTime<Utc>>,
    ) -> RepoResult<i64>;
}

// ============================================================================
// Sale Repository
// ============================================================================

/// Parameters of a draw
#[derive(Debug, Clone)]
pub struct DrawRequest {
    pub sale_id: Snowflake,
    /// Id reserved for the settlement transaction
    pub transaction_id: Snowflake,
    pub performed_by: Snowflake,
    pub policy: SettlementPolicy,
    pub now: DateTime<Utc>,
}

/// Result of closing a sale
#[derive(Debug, Clone)]
pub enum DrawOutcome {
    /// A winner was selected and charged
    Drawn {
        sale: LootTabSale,
        winning_bid: LootTabBid,
        transaction: BalanceTransaction,
    },
    /// The sale had no bids
    Cancelled { sale: LootTabSale },
}

impl DrawOutcome {
    pub fn sale(&self) -> &LootTabSale {
        match self {
            Self::Drawn { sale, .. } | Self::Cancelled { sale } => sale,
        }
    }
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Find sale by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<LootTabSale>>;

    /// List sales of a guild, newest first, optionally filtered by status
    async fn find_by_guild(
        &self,
        guild_id: Snowflake,
        status: Option<SaleStatus>,
    ) -> RepoResult<Vec<LootTabSale>>;

    /// OPEN sales with `expires_at <= now`
    ///
    /// Sales the sweep has never failed on come first, oldest expiry first;
    /// after them come failed sales, least recently failed first.
    async fn find_expired_open(&self, now: DateTime<Utc>, limit: i64) -> RepoResult<Vec<LootTabSale>>;

    /// Note that the sweep could not settle an OPEN sale at `at`
    ///
    /// Moves the sale behind every sale that has not failed more recently in
    /// `find_expired_open`. No-op for a missing or closed sale.
    async fn record_sweep_failure(&self, id: Snowflake, at: DateTime<Utc>) -> RepoResult<()>;

    /// Persist a freshly opened sale
    async fn create(&self, sale: &LootTabSale) -> RepoResult<()>;

    /// Move an OPEN sale to CANCELLED
    async fn cancel(&self, id: Snowflake, now: DateTime<Utc>) -> RepoResult<LootTabSale>;

    /// Close an OPEN sale: select the winner, transition, and settle
    ///
    /// Runs as one atomic unit holding the sale exclusively. At most one call
    /// per sale succeeds; later calls get `SaleNotOpen`. A settlement error
    /// rolls everything back and is reported as `SettlementFailed`, leaving
    /// the sale OPEN.
    async fn draw(&self, request: DrawRequest) -> RepoResult<DrawOutcome>;
}

// ============================================================================
// Bid Repository
// ============================================================================

#[async_trait]
pub trait BidRepository: Send + Sync {
    /// All bids of a sale in submission order
    async fn find_by_sale(&self, sale_id: Snowflake) -> RepoResult<Vec<LootTabBid>>;

    /// Insert a bid after re-checking the sale under lock
    async fn place(&self, bid: &LootTabBid, now: DateTime<Utc>) -> RepoResult<()>;

    /// Remove a bid from a sale that is still OPEN and unsettled
    async fn delete(&self, sale_id: Snowflake, bid_id: Snowflake) -> RepoResult<()>;
}
