use std::fmt;

use crate::validators::ValidationError;

/// Errors produced by the administrative core.
///
/// Every variant maps to a stable, non-leaking client message; store-layer
/// detail only ever appears in `DatabaseError`/`Internal`, which the API
/// layer reports as a generic server error.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminError {
    /// Malformed or out-of-range input. Not authorization-related.
    Validation(ValidationError),
    /// State-changing request whose origin does not match the deployment host.
    CsrfRejected,
    /// No valid session.
    Unauthenticated,
    /// Valid session, insufficient role (or inactive account).
    Forbidden,
    /// Entity absent, or invitation token invalid/expired/consumed.
    /// Deliberately indistinguishable from "wrong token".
    NotFound,
    /// An active profile already exists for this email.
    EmailTaken,
    /// An active invitation already exists for this email.
    InvitationPending,
    /// An owner attempted to delete their own profile.
    SelfDeletion,
    /// Request body exceeds the configured ceiling.
    PayloadTooLarge,
    /// Account was created at the identity provider but profile
    /// provisioning failed; requires operator attention.
    ProvisioningFailed(String),
    /// Store-layer failure. Never surfaced verbatim to clients.
    DatabaseError(String),
    /// Unexpected provider or infrastructure failure.
    Internal(String),
}

impl std::error::Error for AdminError {}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Validation(e) => write!(f, "{e}"),
            AdminError::CsrfRejected => write!(f, "Request origin not allowed"),
            AdminError::Unauthenticated => write!(f, "Authentication required"),
            AdminError::Forbidden => write!(f, "Insufficient permissions"),
            AdminError::NotFound => write!(f, "Not found"),
            AdminError::EmailTaken => write!(f, "An account with this email already exists"),
            AdminError::InvitationPending => {
                write!(f, "An active invitation already exists for this email")
            }
            AdminError::SelfDeletion => write!(f, "You cannot delete your own account"),
            AdminError::PayloadTooLarge => write!(f, "Request body too large"),
            AdminError::ProvisioningFailed(msg) => write!(f, "Account provisioning failed: {msg}"),
            AdminError::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            AdminError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::Validation(err)
    }
}
