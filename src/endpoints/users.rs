use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::endpoints::relationship::{relationship_response, RelationshipResponse};
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::prelude::*;
use crate::services::relationships;
use crate::state::AppState;

/// Create users routes
pub fn users_routes(state: AppState) -> Router {
    Router::new()
        .route("/me", get(get_current_user_info))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// True only while the caller holds an active relationship.
    pub paired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<RelationshipResponse>,
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Get current user info with the pairing summary
async fn get_current_user_info(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<UserResponse>> {
    let current = relationships::find_current_for_user(&state.db, auth_user.0.id).await?;

    let paired = current
        .as_ref()
        .map(|rel| rel.status == RelationshipStatus::Active)
        .unwrap_or(false);
    let relationship = match current {
        Some(rel) => Some(relationship_response(&rel, auth_user.0.id)?),
        None => None,
    };

    Ok(Json(UserResponse {
        id: auth_user.0.id,
        username: auth_user.0.username,
        email: auth_user.0.email,
        created_at: auth_user.0.created_at,
        updated_at: auth_user.0.updated_at,
        paired,
        relationship,
    }))
}
