use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::PairingError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Gone: {0}")]
    Gone(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Translate lifecycle errors into the HTTP vocabulary. The messages here
/// are the API contract; the service layer never writes user-facing text.
impl From<PairingError> for AppError {
    fn from(err: PairingError) -> Self {
        match err {
            PairingError::AlreadyPaired => {
                AppError::Conflict("You already have an active relationship".to_string())
            }
            PairingError::InvitationNotFound => {
                AppError::NotFound("Invitation not found".to_string())
            }
            PairingError::SelfAccept => {
                AppError::BadRequest("You cannot accept your own invitation".to_string())
            }
            PairingError::CreatorAlreadyPaired => {
                AppError::Conflict("The invitation creator is already paired".to_string())
            }
            PairingError::NoActiveRelationship => {
                AppError::NotFound("No relationship in the required state".to_string())
            }
            PairingError::NoPendingResume => {
                AppError::NotFound("No pending resume request".to_string())
            }
            PairingError::GracePeriodExpired => {
                AppError::Gone("The resume window for this relationship has closed".to_string())
            }
            PairingError::Forbidden => {
                AppError::Forbidden("Only the requesting user may cancel a resume request".to_string())
            }
            PairingError::GenerationExhausted => {
                AppError::Internal("Could not generate a unique invite code".to_string())
            }
            PairingError::Conflict => {
                AppError::Internal("Conflicting concurrent update".to_string())
            }
            PairingError::Invariant(msg) => {
                tracing::error!("Relationship invariant violated: {}", msg);
                AppError::Internal("Relationship state is inconsistent".to_string())
            }
            PairingError::Store(e) => AppError::Database(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Gone(msg) => (StatusCode::GONE, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Json(e) => (StatusCode::BAD_REQUEST, format!("JSON error: {}", e)),
        };

        (status, Json(ErrorResponse { detail: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
