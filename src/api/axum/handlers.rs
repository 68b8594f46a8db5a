//! HTTP handlers: thin wrappers that run the request guard, parse the
//! body into typed input, and delegate to the matching action.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use super::error::AppError;
use super::middleware::RequestMeta;
use super::routes::AdminState;
use crate::actions::{
    AcceptInvitationAction, AcceptInvitationInput, DeleteUserAction, InvitationConfig,
    InviteStaffAction, InviteStaffInput, ListInvitationsAction, ListUsersAction,
    LookupInvitationAction, RevokeInvitationAction, UpdateUserAction, UpdateUserInput,
    UpsertProfileAction, UpsertProfileInput,
};
use crate::api::{
    AcceptInvitationRequest, AuditLogResponse, CreateInvitationRequest,
    CreatedInvitationResponse, InvitationResponse, MessageResponse, PageQuery, ProfileResponse,
    UpdateUserRequest, UpsertProfileRequest,
};
use crate::crypto::SecretString;
use crate::error::AdminError;
use crate::guard::RequestGuard;
use crate::identity::IdentityProvider;
use crate::repository::{
    AuditLogRepository, InvitationRepository, Page, ProfileRepository,
};
use crate::roles::{Resource, ResourceAction, StaffRole};
use crate::validators::ValidationError;

const ADMIN_UP: &[StaffRole] = &[StaffRole::Owner, StaffRole::Admin];
const OWNER_ONLY: &[StaffRole] = &[StaffRole::Owner];

fn parse_role(role: &str) -> Result<StaffRole, AdminError> {
    StaffRole::from_str(role).ok_or(AdminError::Validation(ValidationError::InvalidRole))
}

fn page<I, P, D, A>(state: &AdminState<I, P, D, A>, query: &PageQuery) -> Page {
    Page::clamped(
        query.limit.unwrap_or(50),
        query.offset.unwrap_or(0),
        state.config.max_page_size,
    )
}

pub async fn create_invitation<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Json(body): Json<CreateInvitationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    let actor = guard.require(&ctx, ADMIN_UP).await?;

    let role = parse_role(&body.role)?;

    let action = InviteStaffAction::with_config(
        state.invitations.clone(),
        state.profiles.clone(),
        state.provider.clone(),
        state.audit.clone(),
        InvitationConfig::from(&state.config),
    );
    let output = action
        .execute(
            &actor,
            InviteStaffInput {
                email: body.email,
                role,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedInvitationResponse {
            invitation: output.invitation.into(),
            token: output.token,
        }),
    ))
}

pub async fn list_invitations<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    guard.require_read(&ctx, ADMIN_UP).await?;

    let action = ListInvitationsAction::new(state.invitations.clone());
    let invitations = action.execute(page(&state, &query)).await?;

    let responses: Vec<InvitationResponse> =
        invitations.into_iter().map(InvitationResponse::from).collect();
    Ok(Json(responses))
}

/// Public lookup by token. Responds 404 for anything that is not a
/// pending, unexpired invitation.
pub async fn get_invitation<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let action = LookupInvitationAction::new(state.invitations.clone());
    let invitation = action.execute(&SecretString::new(token)).await?;

    Ok(Json(InvitationResponse::from(invitation)))
}

/// Public acceptance. CSRF-checked but unauthenticated; the token is the
/// credential.
pub async fn accept_invitation<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Json(body): Json<AcceptInvitationRequest>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    guard.verify_origin(&ctx)?;

    let action = AcceptInvitationAction::new(
        state.invitations.clone(),
        state.profiles.clone(),
        state.provider.clone(),
        state.audit.clone(),
    );
    let profile = action
        .execute(AcceptInvitationInput {
            token: body.token,
            password: body.password,
            full_name: body.full_name,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProfileResponse::from(profile))))
}

pub async fn revoke_invitation<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    let actor = guard.require(&ctx, ADMIN_UP).await?;

    let action = RevokeInvitationAction::new(state.invitations.clone(), state.audit.clone());
    action.execute(&actor, id).await?;

    Ok(Json(MessageResponse {
        message: "invitation revoked".to_owned(),
    }))
}

/// Self-service profile upsert: any authenticated caller, own id only.
pub async fn upsert_profile<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Json(body): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    guard.verify_origin(&ctx)?;
    let identity = guard.authenticate(&ctx).await?;

    let action = UpsertProfileAction::new(state.profiles.clone());
    let profile = action
        .execute(
            &identity,
            UpsertProfileInput {
                id: body.id,
                full_name: body.full_name,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn list_users<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    guard.require_read(&ctx, ADMIN_UP).await?;

    let action = ListUsersAction::new(state.profiles.clone());
    let profiles = action.execute(page(&state, &query)).await?;

    let responses: Vec<ProfileResponse> =
        profiles.into_iter().map(ProfileResponse::from).collect();
    Ok(Json(responses))
}

pub async fn update_user<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Path(target_id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    let actor = guard.require(&ctx, ADMIN_UP).await?;

    let role = body.role.as_deref().map(parse_role).transpose()?;

    let action = UpdateUserAction::new(state.profiles.clone(), state.audit.clone());
    let profile = action
        .execute(
            &actor,
            &target_id,
            UpdateUserInput {
                role,
                is_active: body.is_active,
            },
        )
        .await?;

    Ok(Json(ProfileResponse::from(profile)))
}

pub async fn delete_user<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Path(target_id): Path<String>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    let actor = guard.require(&ctx, OWNER_ONLY).await?;

    let action = DeleteUserAction::new(state.profiles.clone(), state.audit.clone());
    action.execute(&actor, &target_id).await?;

    Ok(Json(MessageResponse {
        message: "user deleted".to_owned(),
    }))
}

pub async fn list_audit_logs<I, P, D, A>(
    State(state): State<AdminState<I, P, D, A>>,
    meta: RequestMeta,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError>
where
    I: InvitationRepository + Clone + Send + Sync + 'static,
    P: ProfileRepository + Clone + Send + Sync + 'static,
    D: IdentityProvider + Clone + Send + Sync + 'static,
    A: AuditLogRepository + Clone + Send + Sync + 'static,
{
    let ctx = meta.into_context();
    let guard = RequestGuard::new(state.profiles.clone(), state.provider.clone(), &state.config);
    let identity = guard.authenticate(&ctx).await?;
    guard
        .authorize_resource(&identity, Resource::AuditLogs, ResourceAction::View)
        .await?;

    let entries = state.audit.list(page(&state, &query)).await?;

    let responses: Vec<AuditLogResponse> =
        entries.into_iter().map(AuditLogResponse::from).collect();
    Ok(Json(responses))
}
