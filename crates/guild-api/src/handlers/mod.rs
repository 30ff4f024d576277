//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod balances;
pub mod health;
pub mod loot_sales;
