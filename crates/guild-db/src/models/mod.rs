//! Database models - SQLx-compatible structs for PostgreSQL tables

mod bid;
mod membership;
mod sale;
mod transaction;

pub use bid::BidModel;
pub use membership::MembershipModel;
pub use sale::SaleModel;
pub use transaction::TransactionModel;
