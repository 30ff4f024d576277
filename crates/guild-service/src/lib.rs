//! # guild-service
//!
//! Application layer containing the ledger, auction and sweep use cases plus
//! the request/response DTOs exposed by the API.

pub mod dto;
pub mod services;

pub use services::{
    AuctionService, LedgerService, PermissionService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SweepService,
};
