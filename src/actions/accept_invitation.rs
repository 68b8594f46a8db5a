use crate::audit::AuditRecorder;
use crate::crypto::{hash_token, SecretString};
use crate::error::AdminError;
use crate::identity::IdentityProvider;
use crate::repository::{
    AuditAction, AuditLogRepository, AuditTable, CreateProfile, InvitationRepository, Profile,
    ProfileRepository,
};
use crate::sanitize::clean_text;
use crate::validators::{validate_full_name, validate_password, validate_token_shape};

/// Input for accepting an invitation. Public endpoint: every field is
/// untrusted.
#[derive(Debug)]
pub struct AcceptInvitationInput {
    pub token: SecretString,
    pub password: SecretString,
    pub full_name: String,
}

/// Action to accept a staff invitation and provision the account.
///
/// This action:
/// 1. Validates token shape, password strength, and name length,
///    before any store access
/// 2. Atomically claims the invitation (conditional update on
///    `accepted_at`; exactly one concurrent acceptance wins)
/// 3. Creates the identity-provider account
/// 4. Creates the Profile with the invitation's role and inviter
/// 5. Writes an audit entry (best-effort)
///
/// Unknown, expired, and already-consumed tokens all fail with
/// `NotFound`; the caller cannot tell which it was.
pub struct AcceptInvitationAction<I, P, D, A>
where
    I: InvitationRepository,
    P: ProfileRepository,
    D: IdentityProvider,
    A: AuditLogRepository,
{
    invitations: I,
    profiles: P,
    provider: D,
    audit: AuditRecorder<A>,
}

impl<I, P, D, A> AcceptInvitationAction<I, P, D, A>
where
    I: InvitationRepository,
    P: ProfileRepository,
    D: IdentityProvider,
    A: AuditLogRepository,
{
    /// Creates a new `AcceptInvitationAction`.
    pub fn new(invitations: I, profiles: P, provider: D, audit: A) -> Self {
        Self {
            invitations,
            profiles,
            provider,
            audit: AuditRecorder::new(audit),
        }
    }

    /// Accepts an invitation using the provided token.
    ///
    /// # Returns
    ///
    /// - `Ok(profile)` - Account provisioned with the invitation's role
    /// - `Err(AdminError::Validation(_))` - Malformed token/password/name
    /// - `Err(AdminError::NotFound)` - Token unknown, expired, or consumed
    /// - `Err(AdminError::ProvisioningFailed(_))` - Identity account was
    ///   created but the profile write failed; needs operator attention
    /// - `Err(_)` - Database or provider errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "accept_invitation", skip_all, err)
    )]
    pub async fn execute(&self, input: AcceptInvitationInput) -> Result<Profile, AdminError> {
        // all field validation happens before the store is touched
        validate_token_shape(input.token.expose_secret())?;
        validate_password(input.password.expose_secret())?;
        validate_full_name(&input.full_name)?;
        let full_name = clean_text(&input.full_name);

        let token_hash = hash_token(input.token.expose_secret());

        // single conditional update: re-checks pending/unexpired state at
        // accept time and claims the row; a concurrent second attempt on
        // the same token loses here
        let invitation = self
            .invitations
            .accept_pending(&token_hash)
            .await?
            .ok_or(AdminError::NotFound)?;

        let subject = self
            .provider
            .create_account(&invitation.email, &input.password)
            .await?;

        let profile = self
            .profiles
            .create(CreateProfile {
                id: subject.clone(),
                email: invitation.email.clone(),
                full_name,
                role: invitation.role,
                invited_by: Some(invitation.invited_by.clone()),
            })
            .await
            .map_err(|e| {
                // the identity account now exists without a profile;
                // surface that state explicitly instead of a generic error
                log::error!(
                    target: "atrio_admin",
                    "msg=\"profile creation failed after account creation\", subject=\"{subject}\", error=\"{e}\""
                );
                AdminError::ProvisioningFailed(format!(
                    "account exists for {} but has no profile",
                    invitation.email
                ))
            })?;

        self.audit
            .record(
                AuditTable::Profiles,
                AuditAction::Insert,
                &profile.id,
                &profile.id,
                format!(
                    "accepted invitation {} as {}",
                    invitation.id,
                    profile.role.as_str()
                ),
            )
            .await;

        log::info!(
            target: "atrio_admin",
            "msg=\"invitation accepted\", invitation_id={}, profile_id=\"{}\", role=\"{}\"",
            invitation.id,
            profile.id,
            profile.role.as_str()
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityProvider;
    use crate::repository::{
        CreateInvitation, MockAuditLogRepository, MockInvitationRepository,
        MockProfileRepository,
    };
    use crate::roles::StaffRole;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    const TOKEN: &str = "Qm3kT9xWfA7pL2rYdB5nC8sV1gH4jZ6uE0iO3aS5dF7gH9jK";

    struct Repos {
        invitations: Arc<MockInvitationRepository>,
        profiles: Arc<MockProfileRepository>,
        provider: Arc<MockIdentityProvider>,
        audit: Arc<MockAuditLogRepository>,
    }

    fn setup() -> (
        Repos,
        AcceptInvitationAction<
            Arc<MockInvitationRepository>,
            Arc<MockProfileRepository>,
            Arc<MockIdentityProvider>,
            Arc<MockAuditLogRepository>,
        >,
    ) {
        let repos = Repos {
            invitations: Arc::new(MockInvitationRepository::new()),
            profiles: Arc::new(MockProfileRepository::new()),
            provider: Arc::new(MockIdentityProvider::new()),
            audit: Arc::new(MockAuditLogRepository::new()),
        };
        let action = AcceptInvitationAction::new(
            Arc::clone(&repos.invitations),
            Arc::clone(&repos.profiles),
            Arc::clone(&repos.provider),
            Arc::clone(&repos.audit),
        );
        (repos, action)
    }

    async fn seed_invitation(repos: &Repos, expires_in: Duration) {
        repos
            .invitations
            .create(CreateInvitation {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Officer,
                token_hash: hash_token(TOKEN),
                invited_by: "subj-owner".to_owned(),
                expires_at: Utc::now() + expires_in,
            })
            .await
            .unwrap();
    }

    fn input(token: &str) -> AcceptInvitationInput {
        AcceptInvitationInput {
            token: SecretString::new(token),
            password: SecretString::new("Str0ng!Enough"),
            full_name: "New Officer".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_accept_success() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::hours(1)).await;

        let profile = action.execute(input(TOKEN)).await.unwrap();

        assert_eq!(profile.email, "new@staff.org");
        assert_eq!(profile.role, StaffRole::Officer);
        assert_eq!(profile.invited_by.as_deref(), Some("subj-owner"));
        assert_eq!(repos.provider.account_count(), 1);
        assert_eq!(repos.audit.entry_count(), 1);

        // the invitation is now consumed
        let stored = repos.invitations.invitations.lock().unwrap();
        assert!(stored[0].accepted_at.is_some());
    }

    #[tokio::test]
    async fn test_second_accept_fails_without_second_profile() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::hours(1)).await;

        action.execute(input(TOKEN)).await.unwrap();
        let result = action.execute(input(TOKEN)).await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
        assert_eq!(repos.provider.account_count(), 1);
        assert_eq!(repos.profiles.profiles.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expired_invitation_rejected() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::minutes(-5)).await;

        let result = action.execute(input(TOKEN)).await;

        // expired is indistinguishable from wrong token
        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
        assert_eq!(repos.provider.account_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let (_repos, action) = setup();

        let result = action
            .execute(input("WrongToken00000000000000000000000000000000000000"))
            .await;

        assert!(matches!(result.unwrap_err(), AdminError::NotFound));
    }

    #[tokio::test]
    async fn test_weak_password_rejected_before_store() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::hours(1)).await;

        let result = action
            .execute(AcceptInvitationInput {
                token: SecretString::new(TOKEN),
                password: SecretString::new("weak"),
                full_name: "New Officer".to_owned(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AdminError::Validation(_)));
        // the invitation was not claimed
        let stored = repos.invitations.invitations.lock().unwrap();
        assert!(stored[0].accepted_at.is_none());
    }

    #[tokio::test]
    async fn test_malformed_token_rejected_before_store() {
        let (_repos, action) = setup();

        let result = action.execute(input("short")).await;
        assert!(matches!(result.unwrap_err(), AdminError::Validation(_)));
    }

    #[tokio::test]
    async fn test_profile_failure_surfaces_provisioning_error() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::hours(1)).await;

        // a profile already holds the email, so the profile write will
        // conflict after the identity account is created
        repos
            .profiles
            .seed("subj-existing", "new@staff.org", StaffRole::Officer);

        let result = action.execute(input(TOKEN)).await;

        assert!(matches!(
            result.unwrap_err(),
            AdminError::ProvisioningFailed(_)
        ));
        assert_eq!(repos.provider.account_count(), 1);
    }

    #[tokio::test]
    async fn test_name_is_sanitized() {
        let (repos, action) = setup();
        seed_invitation(&repos, Duration::hours(1)).await;

        let profile = action
            .execute(AcceptInvitationInput {
                token: SecretString::new(TOKEN),
                password: SecretString::new("Str0ng!Enough"),
                full_name: "New <script>alert(1)</script>Officer".to_owned(),
            })
            .await
            .unwrap();

        assert_eq!(profile.full_name, "New alert(1)Officer");
        drop(repos);
    }
}
