pub mod invitations;
pub mod posts;
pub mod relationship;
pub mod users;

use axum::{middleware as axum_middleware, Router};

use crate::config::CONFIG;
use crate::middleware::require_identity;
use crate::state::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no identity required)
    let public_routes = Router::new().route("/api/health", axum::routing::get(health_check));

    // Protected routes (identity required)
    let protected_routes = Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(axum_middleware::from_fn_with_state(state, require_identity));

    // Merge public and protected routes
    public_routes.merge(protected_routes)
}

/// API routes under /api/* (protected by identity middleware)
fn api_routes(state: AppState) -> Router {
    Router::new()
        .nest("/users", users::users_routes(state.clone()))
        .nest("/invitation", invitations::invitation_routes(state.clone()))
        .nest(
            "/relationship",
            relationship::relationship_routes(state.clone()),
        )
        .nest("/posts", posts::posts_routes(state))
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": CONFIG.version,
    }))
}
