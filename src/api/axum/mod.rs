//! Axum bindings for the administrative core.

pub mod cors;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use error::AppError;
pub use middleware::{extract_bearer_token, RequestMeta};
pub use routes::{admin_routes, AdminState};
