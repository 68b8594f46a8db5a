use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::ErrorResponse;
use crate::error::AdminError;

/// Converts [`AdminError`] into the appropriate HTTP response.
#[derive(Debug)]
pub struct AppError(pub AdminError);

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AdminError::CsrfRejected | AdminError::Forbidden => StatusCode::FORBIDDEN,
            AdminError::NotFound => StatusCode::NOT_FOUND,
            AdminError::EmailTaken
            | AdminError::InvitationPending
            | AdminError::SelfDeletion => StatusCode::CONFLICT,
            AdminError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AdminError::ProvisioningFailed(_)
            | AdminError::DatabaseError(_)
            | AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error_response = ErrorResponse::from(self.0);
        (status, Json(error_response)).into_response()
    }
}
