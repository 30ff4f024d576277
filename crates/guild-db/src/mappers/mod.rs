//! Entity to model mappers
//!
//! Conversions between domain entities (guild-core) and database models.
//! - `From<Model>`/`TryFrom<Model>` for entities: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database operations

mod bid;
mod membership;
mod sale;
mod transaction;

pub use membership::MembershipInsert;
pub use sale::SaleInsert;
