//! Repository traits (ports)

mod repositories;

pub use repositories::{
    BidRepository, DrawOutcome, DrawRequest, LedgerRepository, MembershipRepository,
    RepoResult, SaleRepository, TransactionQuery,
};
