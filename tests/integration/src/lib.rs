//! Integration test utilities for the guild ledger
//!
//! Spawns the full HTTP stack over the in-memory store so the REST API can be
//! exercised end to end without external services.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
