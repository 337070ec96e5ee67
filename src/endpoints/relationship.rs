use axum::{
    extract::{Extension, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::prelude::*;
use crate::models::relationship;
use crate::services::{deletion_deadline, lifecycle, relationships, ResumeOutcome};
use crate::state::AppState;

/// Create relationship routes
pub fn relationship_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_relationship).patch(update_relationship))
        .route("/end", post(end_relationship))
        .route("/resume", post(resume_relationship))
        .route("/resume/cancel", post(cancel_resume))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RelationshipResponse {
    pub id: i64,
    pub status: RelationshipStatus,
    /// The other member, from the caller's point of view.
    pub partner_id: i64,
    pub start_date: Option<chrono::NaiveDate>,
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    /// When a pending-deletion relationship stops being resumable.
    pub deletion_deadline: Option<chrono::DateTime<chrono::Utc>>,
    pub resume_requested_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateRelationshipRequest {
    /// Anniversary date shown on the couple's page. Omit or send null to clear.
    pub start_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ResumeResponse {
    pub outcome: ResumeOutcome,
    pub relationship: RelationshipResponse,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Project a relationship row into the caller-relative response shape
pub fn relationship_response(
    rel: &relationship::Model,
    viewer_id: i64,
) -> Result<RelationshipResponse> {
    let partner_id = rel.partner_of(viewer_id).ok_or_else(|| {
        AppError::Internal("Caller is not a member of this relationship".to_string())
    })?;

    Ok(RelationshipResponse {
        id: rel.id,
        status: rel.status,
        partner_id,
        start_date: rel.start_date,
        ended_at: rel.ended_at,
        deletion_deadline: deletion_deadline(rel),
        resume_requested_by: rel.resume_requested_by,
        created_at: rel.created_at,
        updated_at: rel.updated_at,
    })
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Get the caller's current relationship, active or pending deletion
#[utoipa::path(
    get,
    path = "/api/relationship",
    tag = "Relationship",
    responses(
        (status = 200, body = RelationshipResponse),
        (status = 404, description = "Caller has no relationship")
    )
)]
async fn get_relationship(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<RelationshipResponse>> {
    let rel = relationships::find_current_for_user(&state.db, auth_user.0.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No relationship found".to_string()))?;

    Ok(Json(relationship_response(&rel, auth_user.0.id)?))
}

/// Set or clear the anniversary date on the active relationship
#[utoipa::path(
    patch,
    path = "/api/relationship",
    tag = "Relationship",
    request_body = UpdateRelationshipRequest,
    responses(
        (status = 200, body = RelationshipResponse),
        (status = 404, description = "Caller has no active relationship")
    )
)]
async fn update_relationship(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(data): Json<UpdateRelationshipRequest>,
) -> Result<Json<RelationshipResponse>> {
    let now = state.now();
    let rel =
        relationships::set_start_date(&state.db, auth_user.0.id, data.start_date, now).await?;

    Ok(Json(relationship_response(&rel, auth_user.0.id)?))
}

/// End the caller's active relationship, starting the grace period
#[utoipa::path(
    post,
    path = "/api/relationship/end",
    tag = "Relationship",
    responses(
        (status = 200, body = RelationshipResponse),
        (status = 404, description = "Caller has no active relationship")
    )
)]
async fn end_relationship(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<RelationshipResponse>> {
    let now = state.now();
    let rel = lifecycle::end(&state.db, auth_user.0.id, now).await?;

    Ok(Json(relationship_response(&rel, auth_user.0.id)?))
}

/// Request, restate, or complete resuming the caller's ended relationship
#[utoipa::path(
    post,
    path = "/api/relationship/resume",
    tag = "Relationship",
    responses(
        (status = 200, body = ResumeResponse),
        (status = 404, description = "Caller has no pending-deletion relationship"),
        (status = 410, description = "The grace period has already passed")
    )
)]
async fn resume_relationship(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<ResumeResponse>> {
    let now = state.now();
    let (outcome, rel) = lifecycle::resume(&state.db, auth_user.0.id, now).await?;

    Ok(Json(ResumeResponse {
        outcome,
        relationship: relationship_response(&rel, auth_user.0.id)?,
    }))
}

/// Withdraw the caller's own resume request
#[utoipa::path(
    post,
    path = "/api/relationship/resume/cancel",
    tag = "Relationship",
    responses(
        (status = 200, body = RelationshipResponse),
        (status = 403, description = "Only the requester may cancel"),
        (status = 404, description = "No resume request outstanding")
    )
)]
async fn cancel_resume(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<RelationshipResponse>> {
    let now = state.now();
    let rel = lifecycle::cancel_resume(&state.db, auth_user.0.id, now).await?;

    Ok(Json(relationship_response(&rel, auth_user.0.id)?))
}
