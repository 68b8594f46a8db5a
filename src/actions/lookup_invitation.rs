use crate::crypto::{hash_token, SecretString};
use crate::error::AdminError;
use crate::repository::{Invitation, InvitationRepository};
use crate::validators::validate_token_shape;

/// Public lookup of an invitation by its token.
///
/// Valid only while the invitation is pending and unexpired. Wrong,
/// expired, and consumed tokens all answer `NotFound`; the distinction
/// would leak whether a token ever existed.
pub struct LookupInvitationAction<I>
where
    I: InvitationRepository,
{
    invitations: I,
}

impl<I: InvitationRepository> LookupInvitationAction<I> {
    pub fn new(invitations: I) -> Self {
        Self { invitations }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "lookup_invitation", skip_all, err)
    )]
    pub async fn execute(&self, token: &SecretString) -> Result<Invitation, AdminError> {
        validate_token_shape(token.expose_secret()).map_err(|_| AdminError::NotFound)?;

        let token_hash = hash_token(token.expose_secret());

        let invitation = self
            .invitations
            .find_by_token_hash(&token_hash)
            .await?
            .ok_or(AdminError::NotFound)?;

        if !invitation.is_active() {
            return Err(AdminError::NotFound);
        }

        Ok(invitation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{CreateInvitation, MockInvitationRepository};
    use crate::roles::StaffRole;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    const TOKEN: &str = "Qm3kT9xWfA7pL2rYdB5nC8sV1gH4jZ6uE0iO3aS5dF7gH9jK";

    async fn seed(repo: &MockInvitationRepository, expires_in: Duration) -> Invitation {
        repo.create(CreateInvitation {
            email: "new@staff.org".to_owned(),
            role: StaffRole::Officer,
            token_hash: hash_token(TOKEN),
            invited_by: "subj-owner".to_owned(),
            expires_at: Utc::now() + expires_in,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_lookup_pending() {
        let repo = Arc::new(MockInvitationRepository::new());
        let created = seed(&repo, Duration::hours(1)).await;

        let action = LookupInvitationAction::new(Arc::clone(&repo));
        let found = action.execute(&SecretString::new(TOKEN)).await.unwrap();

        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "new@staff.org");
    }

    #[tokio::test]
    async fn test_lookup_expired_is_not_found() {
        let repo = Arc::new(MockInvitationRepository::new());
        seed(&repo, Duration::minutes(-1)).await;

        let action = LookupInvitationAction::new(Arc::clone(&repo));
        let result = action.execute(&SecretString::new(TOKEN)).await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
    }

    #[tokio::test]
    async fn test_lookup_consumed_is_not_found() {
        let repo = Arc::new(MockInvitationRepository::new());
        seed(&repo, Duration::hours(1)).await;
        repo.accept_pending(&hash_token(TOKEN)).await.unwrap();

        let action = LookupInvitationAction::new(Arc::clone(&repo));
        let result = action.execute(&SecretString::new(TOKEN)).await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
    }

    #[tokio::test]
    async fn test_lookup_wrong_token_same_error() {
        let repo = Arc::new(MockInvitationRepository::new());
        seed(&repo, Duration::hours(1)).await;

        let action = LookupInvitationAction::new(Arc::clone(&repo));
        let wrong = action
            .execute(&SecretString::new(
                "WrongToken00000000000000000000000000000000000000",
            ))
            .await
            .unwrap_err();
        let malformed = action
            .execute(&SecretString::new("x"))
            .await
            .unwrap_err();

        // shape failures and misses are indistinguishable
        assert_eq!(wrong, AdminError::NotFound);
        assert_eq!(malformed, AdminError::NotFound);
    }
}
