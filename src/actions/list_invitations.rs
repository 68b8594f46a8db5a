use crate::error::AdminError;
use crate::repository::{Invitation, InvitationRepository, Page};

/// Paginated listing of invitations, newest first.
pub struct ListInvitationsAction<I>
where
    I: InvitationRepository,
{
    invitations: I,
}

impl<I: InvitationRepository> ListInvitationsAction<I> {
    pub fn new(invitations: I) -> Self {
        Self { invitations }
    }

    /// `page` must already be clamped by the caller (see
    /// [`Page::clamped`]).
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "list_invitations", skip_all, err)
    )]
    pub async fn execute(&self, page: Page) -> Result<Vec<Invitation>, AdminError> {
        self.invitations.list(page).await
    }
}
