//! Shared response types.

mod pagination;
mod response;

pub use pagination::{to_paginated_result, PaginatedResult};
pub use response::{ApiResponse, Created, MessageResponse, NoContent};
