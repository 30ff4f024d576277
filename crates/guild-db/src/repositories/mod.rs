//! PostgreSQL repository implementations

mod bid;
pub(crate) mod error;
mod ledger;
mod membership;
mod sale;

pub use bid::PgBidRepository;
pub use ledger::PgLedgerRepository;
pub use membership::PgMembershipRepository;
pub use sale::PgSaleRepository;
