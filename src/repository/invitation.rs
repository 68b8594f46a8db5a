use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;
use crate::error::AdminError;
use crate::roles::StaffRole;

/// A pending grant of a role to an email address.
///
/// Only the SHA-256 digest of the token is stored; the plain token exists
/// exactly once, in the creation response, and cannot be recovered later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invitation {
    pub id: i64,
    pub email: String,
    /// Role granted on acceptance. The owner role is never grantable by
    /// invitation, so this is always `Admin` or `Officer`.
    pub role: StaffRole,
    #[serde(skip_serializing)]
    pub token_hash: String,
    /// Profile id of the inviter.
    pub invited_by: String,
    pub expires_at: DateTime<Utc>,
    /// Set exactly once by the acceptance transition; never cleared.
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Derived lifecycle state. Not stored; computed from `accepted_at` and
/// `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
}

impl Invitation {
    /// Check if the invitation has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }

    /// Check if the invitation has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.is_some()
    }

    /// Derived status at instant `now`. Acceptance wins over expiry.
    pub fn status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.accepted_at.is_some() {
            InvitationStatus::Accepted
        } else if self.expires_at < now {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }

    /// True iff the invitation can still authorize account creation.
    pub fn is_active(&self) -> bool {
        self.status(Utc::now()) == InvitationStatus::Pending
    }
}

#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub email: String,
    pub role: StaffRole,
    pub token_hash: String,
    pub invited_by: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn create(&self, data: CreateInvitation) -> Result<Invitation, AdminError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Invitation>, AdminError>;

    async fn find_by_token_hash(&self, token_hash: &str)
        -> Result<Option<Invitation>, AdminError>;

    /// The at-most-one active (pending, unexpired) invitation for an
    /// email, if any.
    async fn find_active_by_email(&self, email: &str) -> Result<Option<Invitation>, AdminError>;

    /// Atomically claims a pending, unexpired invitation by setting
    /// `accepted_at`, as a single conditional update.
    ///
    /// Exactly one concurrent caller wins; everyone else gets `Ok(None)`,
    /// as does any caller whose token is unknown, expired, or already
    /// consumed. The distinction is deliberately not observable.
    async fn accept_pending(&self, token_hash: &str) -> Result<Option<Invitation>, AdminError>;

    async fn delete(&self, id: i64) -> Result<(), AdminError>;

    async fn list(&self, page: Page) -> Result<Vec<Invitation>, AdminError>;

    /// Maintenance sweep; returns the number of rows removed.
    async fn delete_expired(&self) -> Result<u64, AdminError>;
}

#[async_trait]
impl<T: InvitationRepository + ?Sized> InvitationRepository for std::sync::Arc<T> {
    async fn create(&self, data: CreateInvitation) -> Result<Invitation, AdminError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Invitation>, AdminError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<Invitation>, AdminError> {
        (**self).find_by_token_hash(token_hash).await
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<Invitation>, AdminError> {
        (**self).find_active_by_email(email).await
    }

    async fn accept_pending(&self, token_hash: &str) -> Result<Option<Invitation>, AdminError> {
        (**self).accept_pending(token_hash).await
    }

    async fn delete(&self, id: i64) -> Result<(), AdminError> {
        (**self).delete(id).await
    }

    async fn list(&self, page: Page) -> Result<Vec<Invitation>, AdminError> {
        (**self).list(page).await
    }

    async fn delete_expired(&self) -> Result<u64, AdminError> {
        (**self).delete_expired().await
    }
}
