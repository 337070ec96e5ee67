use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use sea_orm::EntityTrait;
use serde::Serialize;

use crate::endpoints::relationship::{relationship_response, RelationshipResponse};
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::invitation;
use crate::models::prelude::*;
use crate::services::{invitations, pairing};
use crate::state::AppState;

/// Create invitation routes
pub fn invitation_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_my_invitation).post(create_invitation))
        .route("/{code}", get(validate_invitation))
        .route("/{code}/accept", post(accept_invitation))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InvitationResponse {
    pub id: i64,
    pub code: String,
    pub created_by_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct InvitationPreview {
    pub code: String,
    pub created_by_id: i64,
    pub created_by_username: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn invitation_response(invitation: invitation::Model) -> InvitationResponse {
    InvitationResponse {
        id: invitation.id,
        code: invitation.code,
        created_by_id: invitation.created_by_id,
        created_at: invitation.created_at,
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Get the caller's invitation, creating one if none exists
#[utoipa::path(
    get,
    path = "/api/invitation",
    tag = "Invitations",
    responses(
        (status = 200, body = InvitationResponse),
        (status = 409, description = "Caller already has an active relationship")
    )
)]
async fn get_my_invitation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationResponse>> {
    let now = state.now();
    let invitation = invitations::get_or_create(&state.db, auth_user.0.id, now).await?;

    Ok(Json(invitation_response(invitation)))
}

/// Create a fresh invitation, replacing any previous one
#[utoipa::path(
    post,
    path = "/api/invitation",
    tag = "Invitations",
    responses(
        (status = 200, body = InvitationResponse),
        (status = 409, description = "Caller already has an active relationship")
    )
)]
async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationResponse>> {
    let now = state.now();
    let invitation = invitations::create_invitation(&state.db, auth_user.0.id, now).await?;

    Ok(Json(invitation_response(invitation)))
}

/// Validate an invite code for the caller without consuming it
#[utoipa::path(
    get,
    path = "/api/invitation/{code}",
    tag = "Invitations",
    params(
        ("code" = String, Path, description = "Invite code, case-insensitive")
    ),
    responses(
        (status = 200, body = InvitationPreview),
        (status = 400, description = "Caller created this invitation"),
        (status = 404, description = "No such code"),
        (status = 409, description = "The creator has already paired")
    )
)]
async fn validate_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<InvitationPreview>> {
    let invitation = invitations::validate(&state.db, &code, Some(auth_user.0.id)).await?;

    let creator = User::find_by_id(invitation.created_by_id)
        .one(&state.db)
        .await?;
    let created_by_username = creator
        .map(|u| u.username)
        .unwrap_or_else(|| "Unknown".to_string());

    Ok(Json(InvitationPreview {
        code: invitation.code,
        created_by_id: invitation.created_by_id,
        created_by_username,
    }))
}

/// Accept an invite code, consuming it and creating the relationship
#[utoipa::path(
    post,
    path = "/api/invitation/{code}/accept",
    tag = "Invitations",
    params(
        ("code" = String, Path, description = "Invite code, case-insensitive")
    ),
    responses(
        (status = 200, body = RelationshipResponse),
        (status = 400, description = "Caller created this invitation"),
        (status = 404, description = "No such code"),
        (status = 409, description = "Caller or creator already paired")
    )
)]
async fn accept_invitation(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<RelationshipResponse>> {
    let now = state.now();
    let rel = pairing::accept_invitation(&state.db, &code, auth_user.0.id, now).await?;

    Ok(Json(relationship_response(&rel, auth_user.0.id)?))
}
