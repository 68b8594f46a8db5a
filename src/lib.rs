//! Administrative core for a cultural-center website.
//!
//! The crate covers the security-sensitive slice of the backend: the
//! role hierarchy and permission table, the per-request guard (CSRF,
//! authentication, authorization, in that order), the shared
//! validation/sanitization contract, the staff-invitation lifecycle with
//! its audit trail, and the user-management operations sitting on top.
//!
//! Storage and identity are pluggable: implement the
//! [`repository`] traits and [`identity::IdentityProvider`], or enable
//! the `postgres` feature for the sqlx-backed repositories. The
//! `axum-api` feature adds an HTTP surface; `mocks` provides in-memory
//! implementations for integration tests.

pub mod actions;
pub mod api;
pub mod audit;
pub mod config;
pub mod crypto;
pub mod error;
pub mod guard;
pub mod identity;
pub mod repository;
pub mod roles;
pub mod sanitize;
pub mod validators;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use config::AdminConfig;
pub use crypto::SecretString;
pub use error::AdminError;
pub use guard::{CsrfPolicy, RequestContext, RequestGuard};
pub use identity::{IdentityProvider, RequestIdentity};
pub use repository::{
    AuditLogEntry, AuditLogRepository, Invitation, InvitationRepository, InvitationStatus,
    Profile, ProfileRepository,
};
pub use roles::{Resource, ResourceAction, StaffRole};

#[cfg(any(test, feature = "mocks"))]
pub use identity::MockIdentityProvider;
#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockAuditLogRepository, MockExamSessionRepository, MockInvitationRepository,
    MockProfileRepository,
};
