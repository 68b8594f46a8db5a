use crate::audit::AuditRecorder;
use crate::error::AdminError;
use crate::repository::{
    AuditAction, AuditLogRepository, AuditTable, Profile, ProfileRepository,
};
use crate::roles::StaffRole;

/// Fields an owner/admin may change on another staff account.
///
/// Unknown fields are rejected at the DTO layer; absent fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub role: Option<StaffRole>,
    pub is_active: Option<bool>,
}

/// Action to update another user's role or active state.
///
/// Management is strict: the actor must outrank the target's current
/// role, and when assigning a new role must outrank that too. An admin
/// can therefore neither touch another admin nor promote anyone to
/// admin-or-above.
pub struct UpdateUserAction<P, A>
where
    P: ProfileRepository,
    A: AuditLogRepository,
{
    profiles: P,
    audit: AuditRecorder<A>,
}

impl<P, A> UpdateUserAction<P, A>
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
    /// - `Ok(profile)` - Updated target profile
    /// - `Err(AdminError::NotFound)` - Unknown target
    /// - `Err(AdminError::Forbidden)` - Rank rules violated
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "update_user", skip_all, err)
    )]
    pub async fn execute(
        &self,
        actor: &Profile,
        target_id: &str,
        input: UpdateUserInput,
    ) -> Result<Profile, AdminError> {
        let target = self
            .profiles
            .find_by_id(target_id)
            .await?
            .ok_or(AdminError::NotFound)?;

        if !actor.role.can_manage(target.role) {
            return Err(AdminError::Forbidden);
        }

        let mut changes = Vec::new();
        let mut updated = target.clone();

        if let Some(new_role) = input.role {
            if !actor.role.can_manage(new_role) {
                return Err(AdminError::Forbidden);
            }
            updated = self.profiles.update_role(target_id, new_role).await?;
            changes.push(format!(
                "role: {} -> {}",
                target.role.as_str(),
                new_role.as_str()
            ));
        }

        if let Some(is_active) = input.is_active {
            updated = self.profiles.set_active(target_id, is_active).await?;
            changes.push(format!("is_active: {} -> {is_active}", target.is_active));
        }

        if !changes.is_empty() {
            self.audit
                .record(
                    AuditTable::Profiles,
                    AuditAction::Update,
                    target_id,
                    &actor.id,
                    changes.join(", "),
                )
                .await;

            log::info!(
                target: "atrio_admin",
                "msg=\"user updated\", target=\"{target_id}\", changes=\"{}\"",
                changes.join(", ")
            );
        }

        Ok(updated)
    }
}
