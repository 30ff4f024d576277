//! Domain entities - core business objects

mod bid;
mod membership;
mod sale;
mod transaction;

pub use bid::LootTabBid;
pub use membership::{MemberRole, MemberStatus, Membership};
pub use sale::{
    LootTabSale, NewSale, SaleStatus, MAX_DESCRIPTION_LENGTH, MAX_SALE_DURATION_HOURS,
    MIN_SALE_DURATION_HOURS,
};
pub use transaction::{BalanceTransaction, LedgerEntry, MAX_REASON_LENGTH};
