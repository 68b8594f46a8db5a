use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Page;
use crate::error::AdminError;
use crate::roles::StaffRole;

/// A provisioned staff account.
///
/// `id` is the opaque subject issued by the identity provider; the core
/// never inspects or fabricates it. `email` is unique and compared
/// case-insensitively by the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: StaffRole,
    /// The profile that created the invitation this account came from,
    /// if it was provisioned by invitation.
    pub invited_by: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a profile directly (bootstrap or invitation
/// acceptance).
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: StaffRole,
    pub invited_by: Option<String>,
}

/// Input for the self-service upsert.
///
/// Deliberately excludes `role`, `is_active`, and `invited_by`: the
/// self-service path can never touch authorization state.
#[derive(Debug, Clone)]
pub struct UpsertProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn create(&self, data: CreateProfile) -> Result<Profile, AdminError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AdminError>;

    /// Case-insensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AdminError>;

    /// Idempotent self-service upsert. Updates `full_name` (and email)
    /// for an existing row; inserts a new row with the `Officer` role
    /// otherwise. Never alters the role of an existing profile.
    async fn upsert_self(&self, data: UpsertProfile) -> Result<Profile, AdminError>;

    async fn update_role(&self, id: &str, role: StaffRole) -> Result<Profile, AdminError>;

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Profile, AdminError>;

    async fn delete(&self, id: &str) -> Result<(), AdminError>;

    async fn list(&self, page: Page) -> Result<Vec<Profile>, AdminError>;
}

// Shared handles are the common deployment shape (one pool, many
// consumers), so the traits delegate through Arc.
#[async_trait]
impl<T: ProfileRepository + ?Sized> ProfileRepository for std::sync::Arc<T> {
    async fn create(&self, data: CreateProfile) -> Result<Profile, AdminError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Profile>, AdminError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>, AdminError> {
        (**self).find_by_email(email).await
    }

    async fn upsert_self(&self, data: UpsertProfile) -> Result<Profile, AdminError> {
        (**self).upsert_self(data).await
    }

    async fn update_role(&self, id: &str, role: StaffRole) -> Result<Profile, AdminError> {
        (**self).update_role(id, role).await
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<Profile, AdminError> {
        (**self).set_active(id, is_active).await
    }

    async fn delete(&self, id: &str) -> Result<(), AdminError> {
        (**self).delete(id).await
    }

    async fn list(&self, page: Page) -> Result<Vec<Profile>, AdminError> {
        (**self).list(page).await
    }
}
