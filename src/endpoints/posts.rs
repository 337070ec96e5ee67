use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::post;
use crate::models::prelude::*;
use crate::services::relationships;
use crate::state::AppState;

/// Create posts routes
pub fn posts_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{post_id}", get(get_post))
        .with_state(state)
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct ListParams {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub body: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: i64,
    pub relationship_id: i64,
    pub author_id: i64,
    pub title: Option<String>,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn post_response(p: post::Model) -> PostResponse {
    PostResponse {
        id: p.id,
        relationship_id: p.relationship_id,
        author_id: p.author_id,
        title: p.title,
        body: p.body,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

/// Create a post, stamped with the caller's active relationship
async fn create_post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(data): Json<CreatePostRequest>,
) -> Result<Json<PostResponse>> {
    if data.body.trim().is_empty() {
        return Err(AppError::BadRequest("Post body cannot be empty".to_string()));
    }

    let rel = relationships::require_active_for_user(&state.db, auth_user.0.id).await?;
    let now = state.now();

    let new_post = post::ActiveModel {
        relationship_id: Set(rel.id),
        author_id: Set(auth_user.0.id),
        title: Set(data.title),
        body: Set(data.body),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_post.insert(&state.db).await?;

    Ok(Json(post_response(created)))
}

/// List posts of the caller's active relationship, newest first
///
/// Without an active relationship the listing is empty, not an error:
/// post rows survive a pending deletion but stay hidden until a resume.
async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<PostResponse>>> {
    let rel = match relationships::find_active_for_user(&state.db, auth_user.0.id).await? {
        Some(rel) => rel,
        None => return Ok(Json(Vec::new())),
    };

    let skip = params.skip.unwrap_or(0);
    let limit = params.limit.unwrap_or(100);

    let posts = Post::find()
        .filter(post::Column::RelationshipId.eq(rel.id))
        .order_by_desc(post::Column::CreatedAt)
        .offset(skip)
        .limit(limit)
        .all(&state.db)
        .await?;

    Ok(Json(posts.into_iter().map(post_response).collect()))
}

/// Fetch a single post, visible only inside the caller's active relationship
async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Result<Json<PostResponse>> {
    let rel = relationships::find_active_for_user(&state.db, auth_user.0.id).await?;
    let found = Post::find_by_id(post_id).one(&state.db).await?;

    // A post outside the caller's relationship is indistinguishable from a
    // missing one.
    match (rel, found) {
        (Some(rel), Some(p)) if p.relationship_id == rel.id => Ok(Json(post_response(p))),
        _ => Err(AppError::NotFound("Post not found".to_string())),
    }
}
