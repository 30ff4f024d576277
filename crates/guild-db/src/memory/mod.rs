//! In-process storage backend
//!
//! Implements every repository trait over plain collections guarded by one
//! mutex. Each trait method runs entirely inside that critical section, which
//! gives the same atomicity the Postgres repositories get from transactions.
//! Used when no `DATABASE_URL` is configured and by the test suites.

mod store;

pub use store::MemoryStore;
