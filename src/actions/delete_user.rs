use crate::audit::AuditRecorder;
use crate::error::AdminError;
use crate::repository::{
    AuditAction, AuditLogRepository, AuditTable, Profile, ProfileRepository,
};

/// Action to hard-delete a staff profile. Owner only; the guard enforces
/// the role, this action enforces the self-deletion ban.
pub struct DeleteUserAction<P, A>
where
    P: ProfileRepository,
    A: AuditLogRepository,
{
    profiles: P,
    audit: AuditRecorder<A>,
}

impl<P, A> DeleteUserAction<P, A>
where
    P: ProfileRepository,
    A: AuditLogRepository,
{
    pub fn new(profiles: P, audit: A) -> Self {
        Self {
            profiles,
            audit: AuditRecorder::new(audit),
        }
    }

    /// # Returns
    ///
    /// - `Ok(())` - Profile removed
    /// - `Err(AdminError::SelfDeletion)` - Target is the actor; a
    ///   business rule, deliberately distinct from `Forbidden`
    /// - `Err(AdminError::NotFound)` - Unknown target
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "delete_user", skip_all, err)
    )]
    pub async fn execute(&self, actor: &Profile, target_id: &str) -> Result<(), AdminError> {
        if target_id == actor.id {
            return Err(AdminError::SelfDeletion);
        }

        let target = self
            .profiles
            .find_by_id(target_id)
            .await?
            .ok_or(AdminError::NotFound)?;

        self.profiles.delete(target_id).await?;

        self.audit
            .record(
                AuditTable::Profiles,
                AuditAction::Delete,
                target_id,
                &actor.id,
                format!("deleted profile {} ({})", target.email, target.role.as_str()),
            )
            .await;

        log::info!(
            target: "atrio_admin",
            "msg=\"user deleted\", target=\"{target_id}\", email=\"{}\"",
            target.email
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockAuditLogRepository, MockProfileRepository};
    use crate::roles::StaffRole;
    use chrono::Utc;
    use std::sync::Arc;

    fn owner() -> Profile {
        let now = Utc::now();
        Profile {
            id: "subj-owner".to_owned(),
            email: "owner@centro.org".to_owned(),
            full_name: "Owner".to_owned(),
            role: StaffRole::Owner,
            invited_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_delete_other_user() {
        let profiles = Arc::new(MockProfileRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());
        profiles.seed("subj-officer", "officer@centro.org", StaffRole::Officer);

        let action = DeleteUserAction::new(Arc::clone(&profiles), Arc::clone(&audit));
        action.execute(&owner(), "subj-officer").await.unwrap();

        assert!(profiles.profiles.lock().unwrap().is_empty());
        assert_eq!(audit.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_self_delete_rejected_distinctly() {
        let profiles = Arc::new(MockProfileRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());
        profiles.seed("subj-owner", "owner@centro.org", StaffRole::Owner);

        let action = DeleteUserAction::new(Arc::clone(&profiles), Arc::clone(&audit));
        let result = action.execute(&owner(), "subj-owner").await;

        // a business-rule error, not Forbidden
        assert_eq!(result.unwrap_err(), AdminError::SelfDeletion);
        assert_eq!(profiles.profiles.lock().unwrap().len(), 1);
        assert_eq!(audit.entry_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_target() {
        let profiles = Arc::new(MockProfileRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());

        let action = DeleteUserAction::new(Arc::clone(&profiles), Arc::clone(&audit));
        let result = action.execute(&owner(), "subj-ghost").await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
    }
}
