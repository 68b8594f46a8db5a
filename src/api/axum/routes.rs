//! Route configuration for the admin API.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use super::handlers;
use crate::config::AdminConfig;
use crate::identity::IdentityProvider;
use crate::repository::{AuditLogRepository, InvitationRepository, ProfileRepository};

/// Application state for the admin routes.
#[derive(Clone)]
pub struct AdminState<I, P, D, A> {
    /// Invitation repository.
    pub invitations: I,
    /// Profile repository.
    pub profiles: P,
    /// Identity provider (sessions, account creation, delivery).
    pub provider: D,
    /// Audit log repository.
    pub audit: A,
    /// Core configuration; also drives the body-size limit and the
    /// CSRF allow-list.
    pub config: AdminConfig,
}

/// Creates the admin routes.
///
/// # Routes
///
/// ## Invitations
/// - `POST /invitations` - Create invitation (owner/admin)
/// - `GET /invitations` - List invitations, paginated (owner/admin)
/// - `GET /invitations/:token` - Public lookup by token
/// - `POST /invitations/accept` - Public acceptance (CSRF-checked)
/// - `DELETE /invitations/:id` - Revoke a pending invitation (owner/admin)
///
/// ## Profiles & users
/// - `POST /profiles/me` - Self-service upsert (authenticated)
/// - `GET /users` - List users, paginated (owner/admin)
/// - `PATCH /users/:id` - Update role/active state (owner/admin, strict rank)
/// - `DELETE /users/:id` - Delete a user (owner only, never self)
///
/// ## Audit
/// - `GET /audit-logs` - List audit entries (owner)
///
/// Request bodies are capped at the configured ceiling; oversized bodies
/// are rejected before any handler runs.
pub fn admin_routes<I, P, D, A>(config: &AdminConfig) -> Router<AdminState<I, P, D, A>>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    Router::new()
        // Invitations
        .route(
            "/invitations",
            post(handlers::create_invitation::<I, P, D, A>)
                .get(handlers::list_invitations::<I, P, D, A>),
        )
        .route(
            "/invitations/accept",
            post(handlers::accept_invitation::<I, P, D, A>),
        )
        .route(
            "/invitations/:token",
            get(handlers::get_invitation::<I, P, D, A>)
                .delete(handlers::revoke_invitation::<I, P, D, A>),
        )
        // Profiles & users
        .route("/profiles/me", post(handlers::upsert_profile::<I, P, D, A>))
        .route("/users", get(handlers::list_users::<I, P, D, A>))
        .route(
            "/users/:id",
            patch(handlers::update_user::<I, P, D, A>)
                .delete(handlers::delete_user::<I, P, D, A>),
        )
        // Audit
        .route("/audit-logs", get(handlers::list_audit_logs::<I, P, D, A>))
        .layer(DefaultBodyLimit::max(config.max_payload_bytes))
}
