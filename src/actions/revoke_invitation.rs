use crate::audit::AuditRecorder;
use crate::error::AdminError;
use crate::repository::{
    AuditAction, AuditLogRepository, AuditTable, InvitationRepository, Profile,
};

/// Action to revoke (delete) a still-pending invitation.
///
/// Revoking an already-accepted invitation answers `NotFound`: the grant
/// was consumed, and nothing here ever removes a provisioned account.
pub struct RevokeInvitationAction<I, A>
where
    I: InvitationRepository,
    A: AuditLogRepository,
{
    invitations: I,
    audit: AuditRecorder<A>,
}

impl<I, A> RevokeInvitationAction<I, A>
where
    I: InvitationRepository,
    A: AuditLogRepository,
{
    pub fn new(invitations: I, audit: A) -> Self {
        Self {
            invitations,
            audit: AuditRecorder::new(audit),
        }
    }

    /// Deletes a pending invitation.
    ///
    /// `actor` must already have passed the request guard with role
    /// owner or admin.
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Invitation removed; the token is permanently inert
    /// - `Err(AdminError::NotFound)` - Unknown id, or already accepted
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "revoke_invitation", skip_all, err)
    )]
    pub async fn execute(&self, actor: &Profile, id: i64) -> Result<(), AdminError> {
        let invitation = self
            .invitations
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)?;

        if invitation.is_accepted() {
            return Err(AdminError::NotFound);
        }

        self.invitations.delete(id).await?;

        self.audit
            .record(
                AuditTable::Invitations,
                AuditAction::Delete,
                &id.to_string(),
                &actor.id,
                format!("revoked invitation for {}", invitation.email),
            )
            .await;

        log::info!(
            target: "atrio_admin",
            "msg=\"invitation revoked\", invitation_id={id}, email=\"{}\"",
            invitation.email
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash_token;
    use crate::repository::{
        CreateInvitation, MockAuditLogRepository, MockInvitationRepository,
    };
    use crate::roles::StaffRole;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    fn admin() -> Profile {
        let now = Utc::now();
        Profile {
            id: "subj-admin".to_owned(),
            email: "admin@centro.org".to_owned(),
            full_name: "Admin".to_owned(),
            role: StaffRole::Admin,
            invited_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    async fn seed(repo: &MockInvitationRepository) -> i64 {
        repo.create(CreateInvitation {
            email: "new@staff.org".to_owned(),
            role: StaffRole::Officer,
            token_hash: hash_token("some-token-value-with-enough-length"),
            invited_by: "subj-owner".to_owned(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_revoke_pending() {
        let invitations = Arc::new(MockInvitationRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());
        let id = seed(&invitations).await;

        let action = RevokeInvitationAction::new(Arc::clone(&invitations), Arc::clone(&audit));
        action.execute(&admin(), id).await.unwrap();

        assert!(invitations.invitations.lock().unwrap().is_empty());
        assert_eq!(audit.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_revoke_accepted_is_not_found() {
        let invitations = Arc::new(MockInvitationRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());
        let id = seed(&invitations).await;
        invitations
            .accept_pending(&hash_token("some-token-value-with-enough-length"))
            .await
            .unwrap();

        let action = RevokeInvitationAction::new(Arc::clone(&invitations), Arc::clone(&audit));
        let result = action.execute(&admin(), id).await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
        // the accepted row is untouched
        assert_eq!(invitations.invitations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_unknown_id() {
        let invitations = Arc::new(MockInvitationRepository::new());
        let audit = Arc::new(MockAuditLogRepository::new());

        let action = RevokeInvitationAction::new(Arc::clone(&invitations), Arc::clone(&audit));
        let result = action.execute(&admin(), 999).await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
        assert_eq!(audit.entry_count(), 0);
    }
}
