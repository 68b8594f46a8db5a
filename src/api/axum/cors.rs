//! CORS configuration using tower-http.

use axum::http::{header, Method};
use tower_http::cors::CorsLayer;

/// Creates a permissive CORS configuration that allows all origins.
///
/// **Warning**: This is intended for development only. Do not use in
/// production.
pub fn permissive() -> CorsLayer {
    CorsLayer::permissive()
}

/// Creates the default CORS configuration for the admin API.
///
/// Allows:
/// - Specified origins only
/// - GET, POST, PATCH, DELETE, OPTIONS
/// - Authorization, Content-Type, Accept headers
/// - Credentials
/// - Max age of 1 hour for preflight caching
///
/// # Arguments
/// * `allowed_origins` - List of allowed origin URLs (e.g., `["https://admin.example.org"]`)
pub fn default(allowed_origins: &[&str]) -> CorsLayer {
    let origins: Vec<_> = allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
