//! Identity middleware for API routes
//!
//! Resolves the caller from the proxy-provided identity header.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::EntityTrait;

use crate::models::prelude::*;
use crate::models::user;
use crate::state::AppState;

/// Authenticated user stored in request extensions
#[derive(Clone)]
pub struct AuthenticatedUser(pub user::Model);

/// Identity middleware backing all `/api` routes
///
/// The deployment fronts this service with a proxy that authenticates the
/// session and forwards the caller's user id in a trusted header.
/// Returns 401 Unauthorized if the header is missing, malformed, or names
/// an unknown user.
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let user = match resolve_user(&state, req.headers()).await {
        Ok(u) => u,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Add authenticated user to request extensions
    req.extensions_mut().insert(AuthenticatedUser(user));

    next.run(req).await
}

/// Resolve the identity header and fetch the user from the database
async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<user::Model, String> {
    let user_id = state
        .identity
        .resolve(headers)
        .map_err(|e| e.to_string())?;

    let found_user = User::find_by_id(user_id)
        .one(&state.db)
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    found_user.ok_or_else(|| "Unknown user".to_string())
}

/// Create a 401 Unauthorized JSON response
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "detail": message
        })),
    )
        .into_response()
}
