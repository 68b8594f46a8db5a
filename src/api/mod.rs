//! Wire types and HTTP surfaces.

mod types;

pub use types::{
    AcceptInvitationRequest, AuditLogResponse, CreateInvitationRequest,
    CreatedInvitationResponse, ErrorResponse, InvitationResponse, MessageResponse, PageQuery,
    ProfileResponse, UpdateUserRequest, UpsertProfileRequest,
};

#[cfg(feature = "axum-api")]
pub mod axum;
