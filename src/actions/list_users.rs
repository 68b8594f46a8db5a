use crate::error::AdminError;
use crate::repository::{Page, Profile, ProfileRepository};

/// Paginated listing of staff profiles.
pub struct ListUsersAction<P>
where
    P: ProfileRepository,
{
    profiles: P,
}

impl<P: ProfileRepository> ListUsersAction<P> {
    pub fn new(profiles: P) -> Self {
        Self { profiles }
    }

    /// `page` must already be clamped by the caller (see
    /// [`Page::clamped`]).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_users", skip_all, err)
    )]
    pub async fn execute(&self, page: Page) -> Result<Vec<Profile>, AdminError> {
        self.profiles.list(page).await
    }
}
