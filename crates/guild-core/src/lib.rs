//! # guild-core
//!
//! Domain layer for the guild ledger: memberships, balance transactions,
//! loot-tab sales and their bids, the auction rules, and the repository ports.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod auction;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use auction::{leading_bids, select_winner, SettlementPolicy};
pub use entities::{
    BalanceTransaction, LedgerEntry, LootTabBid, LootTabSale, MemberRole, MemberStatus,
    Membership, NewSale, SaleStatus, MAX_DESCRIPTION_LENGTH, MAX_REASON_LENGTH,
    MAX_SALE_DURATION_HOURS, MIN_SALE_DURATION_HOURS,
};
pub use error::DomainError;
pub use traits::{
    BidRepository, DrawOutcome, DrawRequest, LedgerRepository, MembershipRepository,
    RepoResult, SaleRepository, TransactionQuery,
};
pub use value_objects::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
