use chrono::{Duration, Utc};

use crate::audit::AuditRecorder;
use crate::config::AdminConfig;
use crate::crypto::{generate_token, hash_token, SecretString};
use crate::error::AdminError;
use crate::identity::IdentityProvider;
use crate::repository::{
    AuditAction, AuditLogRepository, AuditTable, CreateInvitation, Invitation,
    InvitationRepository, Profile, ProfileRepository,
};
use crate::roles::StaffRole;
use crate::validators::validate_email;

/// Configuration for staff invitations.
#[derive(Debug, Clone)]
pub struct InvitationConfig {
    /// How long the invitation token stays valid. Default: 1 hour.
    pub expiry: Duration,
    /// Generated token length in characters. Default: 48.
    pub token_length: usize,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::hours(1),
            token_length: 48,
        }
    }
}

impl From<&AdminConfig> for InvitationConfig {
    fn from(config: &AdminConfig) -> Self {
        Self {
            expiry: config.invitation_expiry,
            token_length: config.token_length,
        }
    }
}

/// Input data for creating a staff invitation.
#[derive(Debug, Clone)]
pub struct InviteStaffInput {
    pub email: String,
    pub role: StaffRole,
}

/// Output from creating a staff invitation.
#[derive(Debug)]
pub struct InviteStaffOutput {
    /// The created invitation record.
    pub invitation: Invitation,
    /// The plain token to deliver to the invitee (not stored, only
    /// returned once).
    pub token: SecretString,
}

/// Action to invite a new staff member.
///
/// This action:
/// 1. Validates the email
/// 2. Verifies the actor may grant the requested role
/// 3. Rejects emails already holding an active profile or invitation
/// 4. Generates a secure token and creates the invitation record
/// 5. Triggers out-of-band delivery and an audit entry (best-effort)
///
/// Delivery failure does not roll back the invitation; it stays valid
/// and can be surfaced or re-sent manually.
pub struct InviteStaffAction<I, P, D, A>
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
    config: InvitationConfig,
}

impl<I, P, D, A> InviteStaffAction<I, P, D, A>
where
    I: InvitationRepository,
    P: ProfileRepository,
    D: IdentityProvider,
    A: AuditLogRepository,
{
    /// Creates a new `InviteStaffAction` with default configuration.
    pub fn new(invitations: I, profiles: P, provider: D, audit: A) -> Self {
        Self::with_config(
            invitations,
            profiles,
            provider,
            audit,
            InvitationConfig::default(),
        )
    }

    /// Creates a new `InviteStaffAction` with custom configuration.
    pub fn with_config(
        invitations: I,
        profiles: P,
        provider: D,
        audit: A,
        config: InvitationConfig,
    ) -> Self {
        Self {
            invitations,
            profiles,
            provider,
            audit: AuditRecorder::new(audit),
            config,
        }
    }

    /// Creates an invitation for a new staff account.
    ///
    /// `actor` must already have passed the request guard with role
    /// owner or admin.
    ///
    /// # Returns
    ///
    /// - `Ok(output)` - Invitation created, plain token ready for delivery
    /// - `Err(AdminError::Validation(_))` - Malformed email
    /// - `Err(AdminError::Forbidden)` - Actor may not grant this role
    /// - `Err(AdminError::EmailTaken)` - An active profile holds this email
    /// - `Err(AdminError::InvitationPending)` - An active invitation exists
    /// - `Err(_)` - Database or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "invite_staff", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &Profile,
        input: InviteStaffInput,
    ) -> Result<InviteStaffOutput, AdminError> {
        validate_email(&input.email)?;

        if !actor.role.can_invite(input.role) {
            return Err(AdminError::Forbidden);
        }

        // an email with an active profile cannot be re-provisioned
        if let Some(existing) = self.profiles.find_by_email(&input.email).await? {
            if existing.is_active {
                return Err(AdminError::EmailTaken);
            }
        }

        // at most one active invitation per email
        if self
            .invitations
            .find_active_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(AdminError::InvitationPending);
        }

        // token comes from the OS RNG, never from request inputs
        let token = generate_token(self.config.token_length);
        let token_hash = hash_token(&token);
        let expires_at = Utc::now() + self.config.expiry;

        let invitation = self
            .invitations
            .create(CreateInvitation {
                email: input.email,
                role: input.role,
                token_hash,
                invited_by: actor.id.clone(),
                expires_at,
            })
            .await?;

        let token = SecretString::new(token);

        // delivery is best-effort: the invitation is committed and stays
        // valid even if the email never leaves
        if let Err(e) = self
            .provider
            .deliver_invitation(&invitation.email, &token)
            .await
        {
            log::warn!(
                target: "atrio_admin",
                "msg=\"invitation delivery failed\", invitation_id={}, error=\"{e}\"",
                invitation.id
            );
        }

        self.audit
            .record(
                AuditTable::Invitations,
                AuditAction::Insert,
                &invitation.id.to_string(),
                &actor.id,
                format!(
                    "invited {} as {}",
                    invitation.email,
                    invitation.role.as_str()
                ),
            )
            .await;

        log::info!(
            target: "atrio_admin",
            "msg=\"invitation created\", invitation_id={}, email=\"{}\", role=\"{}\"",
            invitation.id,
            invitation.email,
            invitation.role.as_str()
        );

        Ok(InviteStaffOutput { invitation, token })
    }
}
