//! Repository traits and data types.
//!
//! Storage abstractions for the administrative core. Implement these
//! traits to use your own database backend, or enable the `postgres`
//! feature for the sqlx-backed implementations.
//!
//! # Traits
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`ProfileRepository`] | Staff account storage |
//! | [`InvitationRepository`] | Invitation lifecycle storage |
//! | [`AuditLogRepository`] | Append-only audit trail |
//! | [`ExamSessionRepository`] | Exam sessions with atomic slot accounting |
//!
//! # Mock implementations
//!
//! Enable the `mocks` feature for in-memory implementations useful for
//! testing:
//!
//! - [`MockProfileRepository`]
//! - [`MockInvitationRepository`]
//! - [`MockAuditLogRepository`]
//! - [`MockExamSessionRepository`]

mod audit_log;
mod exam;
mod invitation;
mod profile;

#[cfg(any(test, feature = "mocks"))]
mod audit_log_mock;
#[cfg(any(test, feature = "mocks"))]
mod exam_mock;
#[cfg(any(test, feature = "mocks"))]
mod invitation_mock;
#[cfg(any(test, feature = "mocks"))]
mod profile_mock;

pub use audit_log::{AuditAction, AuditLogEntry, AuditLogRepository, AuditTable, NewAuditEntry};
pub use exam::{CreateExamSession, ExamSession, ExamSessionRepository};
pub use invitation::{CreateInvitation, Invitation, InvitationRepository, InvitationStatus};
pub use profile::{CreateProfile, Profile, ProfileRepository, UpsertProfile};

#[cfg(any(test, feature = "mocks"))]
pub use audit_log_mock::MockAuditLogRepository;
#[cfg(any(test, feature = "mocks"))]
pub use exam_mock::MockExamSessionRepository;
#[cfg(any(test, feature = "mocks"))]
pub use invitation_mock::MockInvitationRepository;
#[cfg(any(test, feature = "mocks"))]
pub use profile_mock::MockProfileRepository;

/// A clamped pagination window.
///
/// Client-supplied values pass through [`Page::clamped`], which bounds
/// `limit` by the server-side maximum regardless of what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    /// Builds a page from client-supplied parameters, clamping `limit`
    /// into `1..=max`.
    pub fn clamped(limit: u32, offset: u32, max: u32) -> Self {
        Self {
            limit: limit.clamp(1, max),
            offset,
        }
    }
}
