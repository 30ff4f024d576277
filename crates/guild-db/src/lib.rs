//! # guild-db
//!
//! Storage layer implementing the `guild-core` repository traits.
//!
//! ## Overview
//!
//! - PostgreSQL connection pool and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - PostgreSQL repository implementations
//! - `MemoryStore`, an in-process backend implementing the same traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guild_db::{create_pool, run_migrations, DatabaseConfig, PgLedgerRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::new("postgres://localhost/guild")).await?;
//!     run_migrations(&pool).await?;
//!     let ledger = PgLedgerRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgBidRepository, PgLedgerRepository, PgMembershipRepository, PgSaleRepository,
};
