//! Shared types for list and write endpoints.

mod pagination;
mod response;

pub use pagination::{PaginatedItems, PaginatedResult, PaginationParams};
pub use response::{Created, MessageResponse, NoContent};
