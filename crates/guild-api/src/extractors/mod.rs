//! Axum extractors for request handling
//!
//! Custom extractors for authentication, path IDs, validation, and pagination.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::AuthUser;
pub use pagination::{Pagination, PaginationParams};
pub use path::{GuildIdPath, GuildMemberPath, SaleBidPath, SaleIdPath};
pub use validated::ValidatedJson;
