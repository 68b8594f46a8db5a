//! PostgreSQL-backed repository implementations.
//!
//! Enabled with the `postgres` feature. Every failure path goes through
//! the store-error classifier, so raw driver detail never reaches a
//! client-facing error.

mod audit_log;
mod exam;
mod invitation;
pub mod migrations;
mod profile;

pub use audit_log::PostgresAuditLogRepository;
pub use exam::PostgresExamSessionRepository;
pub use invitation::PostgresInvitationRepository;
pub use profile::PostgresProfileRepository;

use crate::error::AdminError;
use crate::sanitize::StoreErrorKind;

/// Classifies a sqlx error and renders it as a safe `AdminError`.
///
/// The raw error is logged server-side; the returned message is the
/// category's generic one.
pub(crate) fn map_db_error(operation: &'static str, e: sqlx::Error) -> AdminError {
    log::error!(
        target: "atrio_admin",
        "msg=\"database error\", operation=\"{operation}\", error=\"{e}\""
    );

    AdminError::DatabaseError(store_error_kind(&e).user_message().to_owned())
}

pub(crate) fn store_error_kind(e: &sqlx::Error) -> StoreErrorKind {
    match e {
        sqlx::Error::Database(db) => StoreErrorKind::from_code(db.code().as_deref()),
        _ => StoreErrorKind::Other,
    }
}
