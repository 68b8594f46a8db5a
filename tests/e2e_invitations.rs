//! End-to-end tests for the invitation lifecycle.
//!
//! These tests drive the guard and actions over the mock repositories.
//! Run with: `cargo test --features mocks --test e2e_invitations`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::{Duration, Utc};

use atrio::actions::{
    AcceptInvitationAction, AcceptInvitationInput, InvitationConfig, InviteStaffAction,
    InviteStaffInput, ListInvitationsAction, LookupInvitationAction, RevokeInvitationAction,
};
use atrio::config::AdminConfig;
use atrio::guard::{RequestContext, RequestGuard};
use atrio::repository::{InvitationStatus, Page, ProfileRepository};
use atrio::{
    AdminError, MockAuditLogRepository, MockIdentityProvider, MockInvitationRepository,
    MockProfileRepository, SecretString, StaffRole,
};

const ORIGIN: &str = "https://admin.centro.org";

struct World {
    invitations: Arc<MockInvitationRepository>,
    profiles: Arc<MockProfileRepository>,
    provider: Arc<MockIdentityProvider>,
    audit: Arc<MockAuditLogRepository>,
    config: AdminConfig,
}

impl World {
    fn new() -> Self {
        Self {
            invitations: Arc::new(MockInvitationRepository::new()),
            profiles: Arc::new(MockProfileRepository::new()),
            provider: Arc::new(MockIdentityProvider::new()),
            audit: Arc::new(MockAuditLogRepository::new()),
            config: AdminConfig::new().with_origins([ORIGIN]),
        }
    }

    fn guard(&self) -> RequestGuard<Arc<MockProfileRepository>, Arc<MockIdentityProvider>> {
        RequestGuard::new(
            Arc::clone(&self.profiles),
            Arc::clone(&self.provider),
            &self.config,
        )
    }

    fn invite_action(
        &self,
    ) -> InviteStaffAction<
        Arc<MockInvitationRepository>,
        Arc<MockProfileRepository>,
        Arc<MockIdentityProvider>,
        Arc<MockAuditLogRepository>,
    > {
        InviteStaffAction::with_config(
            Arc::clone(&self.invitations),
            Arc::clone(&self.profiles),
            Arc::clone(&self.provider),
            Arc::clone(&self.audit),
            InvitationConfig::from(&self.config),
        )
    }

    fn accept_action(
        &self,
    ) -> AcceptInvitationAction<
        Arc<MockInvitationRepository>,
        Arc<MockProfileRepository>,
        Arc<MockIdentityProvider>,
        Arc<MockAuditLogRepository>,
    > {
        AcceptInvitationAction::new(
            Arc::clone(&self.invitations),
            Arc::clone(&self.profiles),
            Arc::clone(&self.provider),
            Arc::clone(&self.audit),
        )
    }

    /// Seeds an owner profile with a live session, returning the context
    /// an authenticated owner request would carry.
    fn login_owner(&self) -> RequestContext {
        self.profiles
            .seed("subj-owner", "owner@centro.org", StaffRole::Owner);
        self.provider
            .add_session("owner-session", "subj-owner", "owner@centro.org");
        RequestContext {
            origin: Some(ORIGIN.to_owned()),
            referer: None,
            session_token: Some(SecretString::new("owner-session")),
        }
    }
}

#[tokio::test]
async fn test_full_invitation_flow() {
    let world = World::new();
    let ctx = world.login_owner();

    // owner passes the full guard for a mutating request
    let actor = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await
        .unwrap();

    // invite new@staff.org as officer
    let output = world
        .invite_action()
        .execute(
            &actor,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Officer,
            },
        )
        .await
        .unwrap();

    let token = output.token.expose_secret().to_owned();
    assert_eq!(token.len(), 48);
    let expiry_diff = (output.invitation.expires_at - (Utc::now() + Duration::hours(1)))
        .num_seconds()
        .abs();
    assert!(expiry_diff < 5);

    // public lookup by token sees the pending invitation
    let lookup = LookupInvitationAction::new(Arc::clone(&world.invitations));
    let found = lookup.execute(&SecretString::new(&*token)).await.unwrap();
    assert_eq!(found.email, "new@staff.org");
    assert_eq!(found.status(Utc::now()), InvitationStatus::Pending);

    // accept with a strong password provisions the profile
    let profile = world
        .accept_action()
        .execute(AcceptInvitationInput {
            token: SecretString::new(&*token),
            password: SecretString::new("Str0ng!Enough"),
            full_name: "New Officer".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(profile.role, StaffRole::Officer);
    assert_eq!(profile.email, "new@staff.org");
    assert_eq!(profile.invited_by.as_deref(), Some("subj-owner"));

    // the token is now inert for lookup and accept alike
    let relookup = lookup.execute(&SecretString::new(&*token)).await;
    assert!(matches!(relookup.unwrap_err(), AdminError::NotFound));

    let reaccept = world
        .accept_action()
        .execute(AcceptInvitationInput {
            token: SecretString::new(&*token),
            password: SecretString::new("An0ther!Pass"),
            full_name: "Impostor".to_owned(),
        })
        .await;
    assert!(matches!(reaccept.unwrap_err(), AdminError::NotFound));

    // exactly one account, one profile for the invitee
    assert_eq!(world.provider.account_count(), 1);
    assert_eq!(world.profiles.profiles.lock().unwrap().len(), 2);

    // both the invitation and the profile creation were audited
    assert_eq!(world.audit.entry_count(), 2);
}

#[tokio::test]
async fn test_officer_cannot_reach_invite() {
    let world = World::new();
    world
        .profiles
        .seed("subj-officer", "officer@centro.org", StaffRole::Officer);
    world
        .provider
        .add_session("officer-session", "subj-officer", "officer@centro.org");

    let ctx = RequestContext {
        origin: Some(ORIGIN.to_owned()),
        referer: None,
        session_token: Some(SecretString::new("officer-session")),
    };

    // the guard already refuses the role
    let result = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await;
    assert!(matches!(result.unwrap_err(), AdminError::Forbidden));

    // and even with a forged actor the action itself refuses
    let officer = world
        .profiles
        .find_by_id("subj-officer")
        .await
        .unwrap()
        .unwrap();
    let result = world
        .invite_action()
        .execute(
            &officer,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Officer,
            },
        )
        .await;
    assert!(matches!(result.unwrap_err(), AdminError::Forbidden));
}

#[tokio::test]
async fn test_csrf_rejected_before_auth_and_store() {
    let world = World::new();
    let mut ctx = world.login_owner();
    ctx.origin = Some("https://evil.example".to_owned());

    let result = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await;

    assert!(matches!(result.unwrap_err(), AdminError::CsrfRejected));
    // observable: authentication never ran, nothing was written
    assert_eq!(world.provider.resolve_count(), 0);
    assert_eq!(world.audit.entry_count(), 0);
    assert!(world.invitations.invitations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_invitation_dead_on_both_paths() {
    let world = World::new();
    let ctx = world.login_owner();
    let actor = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await
        .unwrap();

    // an invitation that is already expired at creation time
    let action = InviteStaffAction::with_config(
        Arc::clone(&world.invitations),
        Arc::clone(&world.profiles),
        Arc::clone(&world.provider),
        Arc::clone(&world.audit),
        InvitationConfig {
            expiry: Duration::minutes(-5),
            token_length: 48,
        },
    );
    let output = action
        .execute(
            &actor,
            InviteStaffInput {
                email: "late@staff.org".to_owned(),
                role: StaffRole::Officer,
            },
        )
        .await
        .unwrap();
    let token = output.token.expose_secret().to_owned();

    let lookup = LookupInvitationAction::new(Arc::clone(&world.invitations));
    let found = lookup.execute(&SecretString::new(&*token)).await;
    assert!(matches!(found.unwrap_err(), AdminError::NotFound));

    let accepted = world
        .accept_action()
        .execute(AcceptInvitationInput {
            token: SecretString::new(&*token),
            password: SecretString::new("Str0ng!Enough"),
            full_name: "Too Late".to_owned(),
        })
        .await;
    assert!(matches!(accepted.unwrap_err(), AdminError::NotFound));
    assert_eq!(world.provider.account_count(), 0);
}

#[tokio::test]
async fn test_revoke_then_reinvite() {
    let world = World::new();
    let ctx = world.login_owner();
    let actor = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await
        .unwrap();

    let first = world
        .invite_action()
        .execute(
            &actor,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Admin,
            },
        )
        .await
        .unwrap();
    let first_token = first.token.expose_secret().to_owned();

    // a second invitation for the same email conflicts
    let conflict = world
        .invite_action()
        .execute(
            &actor,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Admin,
            },
        )
        .await;
    assert!(matches!(
        conflict.unwrap_err(),
        AdminError::InvitationPending
    ));

    // revoke, then re-invite succeeds and the old token is dead
    let revoke = RevokeInvitationAction::new(
        Arc::clone(&world.invitations),
        Arc::clone(&world.audit),
    );
    revoke.execute(&actor, first.invitation.id).await.unwrap();

    let second = world
        .invite_action()
        .execute(
            &actor,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Admin,
            },
        )
        .await
        .unwrap();

    let accept_old = world
        .accept_action()
        .execute(AcceptInvitationInput {
            token: SecretString::new(&*first_token),
            password: SecretString::new("Str0ng!Enough"),
            full_name: "Revoked".to_owned(),
        })
        .await;
    assert!(matches!(accept_old.unwrap_err(), AdminError::NotFound));

    let accept_new = world
        .accept_action()
        .execute(AcceptInvitationInput {
            token: SecretString::new(second.token.expose_secret()),
            password: SecretString::new("Str0ng!Enough"),
            full_name: "New Admin".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(accept_new.role, StaffRole::Admin);
}

#[tokio::test]
async fn test_concurrent_accept_single_winner() {
    let world = World::new();
    let ctx = world.login_owner();
    let actor = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await
        .unwrap();

    let output = world
        .invite_action()
        .execute(
            &actor,
            InviteStaffInput {
                email: "new@staff.org".to_owned(),
                role: StaffRole::Officer,
            },
        )
        .await
        .unwrap();
    let token = output.token.expose_secret().to_owned();

    // race two acceptances for the same token
    let a = world.accept_action();
    let b = world.accept_action();
    let input = |name: &str| AcceptInvitationInput {
        token: SecretString::new(&*token),
        password: SecretString::new("Str0ng!Enough"),
        full_name: name.to_owned(),
    };

    let (ra, rb) = tokio::join!(a.execute(input("First")), b.execute(input("Second")));

    let winners = [&ra, &rb].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one acceptance must win");
    assert_eq!(world.provider.account_count(), 1);

    // one owner profile + one provisioned profile, never two
    assert_eq!(world.profiles.profiles.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_invitations_clamped() {
    let world = World::new();
    let ctx = world.login_owner();
    let actor = world
        .guard()
        .require(&ctx, &[StaffRole::Owner, StaffRole::Admin])
        .await
        .unwrap();

    for i in 0..3 {
        world
            .invite_action()
            .execute(
                &actor,
                InviteStaffInput {
                    email: format!("user{i}@staff.org"),
                    role: StaffRole::Officer,
                },
            )
            .await
            .unwrap();
    }

    let list = ListInvitationsAction::new(Arc::clone(&world.invitations));
    // a hostile limit is clamped server-side
    let page = Page::clamped(10_000, 0, world.config.max_page_size);
    assert_eq!(page.limit, world.config.max_page_size);

    let invitations = list.execute(page).await.unwrap();
    assert_eq!(invitations.len(), 3);
}
