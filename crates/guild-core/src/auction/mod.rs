//! Auction rules shared by every storage backend
//!
//! Winner selection and the settlement formula are pure functions so the
//! Postgres and in-memory stores apply exactly the same rule inside their own
//! atomic sections.

mod settlement;
mod winner;

pub use settlement::SettlementPolicy;
pub use winner::{leading_bids, select_winner};
