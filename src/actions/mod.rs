//! One action per administrative operation.
//!
//! Actions hold the business rules; they assume the caller has already
//! passed the [`RequestGuard`](crate::guard::RequestGuard) where a guard
//! applies, and they receive the authorized actor profile explicitly.
//! Public (unauthenticated) actions validate every input field before
//! touching any repository.

mod accept_invitation;
mod delete_user;
mod invite_staff;
mod list_invitations;
mod list_users;
mod lookup_invitation;
mod revoke_invitation;
mod update_user;
mod upsert_profile;

pub use accept_invitation::{AcceptInvitationAction, AcceptInvitationInput};
pub use delete_user::DeleteUserAction;
pub use invite_staff::{InvitationConfig, InviteStaffAction, InviteStaffInput, InviteStaffOutput};
pub use list_invitations::ListInvitationsAction;
pub use list_users::ListUsersAction;
pub use lookup_invitation::LookupInvitationAction;
pub use revoke_invitation::RevokeInvitationAction;
pub use update_user::{UpdateUserAction, UpdateUserInput};
pub use upsert_profile::{UpsertProfileAction, UpsertProfileInput};
