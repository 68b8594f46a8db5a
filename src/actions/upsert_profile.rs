use crate::error::AdminError;
use crate::identity::RequestIdentity;
use crate::repository::{Profile, ProfileRepository, UpsertProfile};
use crate::sanitize::clean_text;
use crate::validators::validate_full_name;

/// Input for the self-service profile upsert.
#[derive(Debug, Clone)]
pub struct UpsertProfileInput {
    /// Must equal the caller's own subject.
    pub id: String,
    pub full_name: String,
}

/// Idempotent self-service profile upsert.
///
/// The target id must equal the authenticated caller's subject; the
/// upsert can never touch role or active state (the repository contract
/// excludes them from this path).
pub struct UpsertProfileAction<P>
where
    P: ProfileRepository,
{
    profiles: P,
}

impl<P: ProfileRepository> UpsertProfileAction<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// # Returns
    ///
    /// - `Ok(profile)` - Created or updated
    /// - `Err(AdminError::Forbidden)` - Target id is not the caller
    /// - `Err(AdminError::Validation(_))` - Name fails validation
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "upsert_profile", skip_all, err)
    )]
    pub async fn execute(
        &self,
        identity: &RequestIdentity,
        input: UpsertProfileInput,
    ) -> Result<Profile, AdminError> {
        if input.id != identity.subject {
            return Err(AdminError::Forbidden);
        }

        validate_full_name(&input.full_name)?;
        let full_name = clean_text(&input.full_name);

        self.profiles
            .upsert_self(UpsertProfile {
                id: identity.subject.clone(),
                email: identity.email.clone(),
                full_name,
            })
            .await
    }
}
