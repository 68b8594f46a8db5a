use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SecretString;
use crate::error::AdminError;
use crate::repository::{AuditLogEntry, Invitation, InvitationStatus, Profile};

// Request DTOs
//
// Every request body is an explicit tagged structure validated
// field-by-field; unknown fields are rejected rather than silently
// ignored.

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateInvitationRequest {
    pub email: String,
    /// `"admin"` or `"officer"`; parsed against the closed role enum.
    pub role: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcceptInvitationRequest {
    pub token: SecretString,
    pub password: SecretString,
    pub full_name: String,
}

impl std::fmt::Debug for AcceptInvitationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceptInvitationRequest")
            .field("token", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertProfileRequest {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Pagination query parameters. Values are clamped server-side
/// regardless of what the client asks for.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct InvitationResponse {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub status: InvitationStatus,
    pub invited_by: String,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Invitation> for InvitationResponse {
    fn from(invitation: Invitation) -> Self {
        InvitationResponse {
            id: invitation.id,
            email: invitation.email.clone(),
            role: invitation.role.as_str().to_owned(),
            status: invitation.status(Utc::now()),
            invited_by: invitation.invited_by.clone(),
            expires_at: invitation.expires_at,
            accepted_at: invitation.accepted_at,
            created_at: invitation.created_at,
        }
    }
}

/// Creation response: the only place the plain token ever appears.
#[derive(Serialize)]
pub struct CreatedInvitationResponse {
    pub invitation: InvitationResponse,
    pub token: SecretString,
}

impl std::fmt::Debug for CreatedInvitationResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatedInvitationResponse")
            .field("invitation", &self.invitation)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        ProfileResponse {
            id: profile.id,
            email: profile.email,
            full_name: profile.full_name,
            role: profile.role.as_str().to_owned(),
            is_active: profile.is_active,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub id: i64,
    pub table_name: String,
    pub action: String,
    pub record_id: String,
    pub user_id: String,
    pub changes: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLogEntry> for AuditLogResponse {
    fn from(entry: AuditLogEntry) -> Self {
        AuditLogResponse {
            id: entry.id,
            table_name: entry.table_name.as_str().to_owned(),
            action: entry.action.as_str().to_owned(),
            record_id: entry.record_id,
            user_id: entry.user_id,
            changes: entry.changes,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<AdminError> for ErrorResponse {
    fn from(err: AdminError) -> Self {
        let code = match &err {
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::CsrfRejected => "CSRF_REJECTED",
            AdminError::Unauthenticated => "UNAUTHENTICATED",
            AdminError::Forbidden => "FORBIDDEN",
            AdminError::NotFound => "NOT_FOUND",
            AdminError::EmailTaken => "EMAIL_TAKEN",
            AdminError::InvitationPending => "INVITATION_PENDING",
            AdminError::SelfDeletion => "SELF_DELETION",
            AdminError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AdminError::ProvisioningFailed(_) => "PROVISIONING_FAILED",
            AdminError::DatabaseError(_) => "DATABASE_ERROR",
            AdminError::Internal(_) => "INTERNAL_ERROR",
        };

        // store/provider detail never crosses the wire
        let error = match &err {
            AdminError::DatabaseError(_) | AdminError::Internal(_) => {
                "An unexpected error occurred".to_owned()
            }
            _ => err.to_string(),
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}
