//! Database migrations for the postgres backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use atrio::postgres::migrations;
//! use sqlx::PgPool;
//!
//! async fn setup_database(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
//!     migrations::run(pool).await
//! }
//! ```

use sqlx::PgPool;

/// Runs all migrations.
///
/// Creates, in order:
/// - `profiles`
/// - `staff_invitations`
/// - `audit_logs`
/// - `exam_sessions`
pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
