//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates
//! permission checks, domain validation and repository calls.

pub mod auction;
pub mod context;
pub mod error;
pub mod ledger;
pub mod permission;
pub mod sweep;

pub use auction::AuctionService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use ledger::LedgerService;
pub use permission::PermissionService;
pub use sweep::{SweepEntry, SweepReport, SweepResult, SweepService};
