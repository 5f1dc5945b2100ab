//! API middleware.

mod auth;
mod error_reporting;

pub use auth::{admin_middleware, auth_middleware, require_admin, CurrentAccount};
pub use error_reporting::error_reporting_middleware;
