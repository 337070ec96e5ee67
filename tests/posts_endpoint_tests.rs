//! Posts endpoint integration tests
//!
//! Covers:
//! - `POST /api/posts` — create inside the active relationship
//! - `GET /api/posts` — relationship-scoped listing, newest first
//! - `GET /api/posts/{id}` — single-post visibility boundary
//! - visibility across end and resume

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

mod common;
use common::{build_app_state, create_test_db, create_test_user, insert_relationship, request_as};

use tandem::models::prelude::*;
use tandem::state::AppState;

async fn create_post(state: &AppState, user_id: i64, body: &str) -> serde_json::Value {
    let (status, json) = request_as(
        state,
        user_id,
        "POST",
        "/api/posts",
        Some(json!({"body": body})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "creating post failed: {:?}", json);
    json
}

// ============================================================================
// POST /api/posts
// ============================================================================

#[tokio::test]
async fn test_create_post() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    let rel =
        insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let (status, body) = request_as(
        &state,
        alice.id,
        "POST",
        "/api/posts",
        Some(json!({"title": "First entry", "body": "We made pasta."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["relationship_id"], rel.id);
    assert_eq!(body["author_id"], alice.id);
    assert_eq!(body["title"], "First entry");
    assert_eq!(body["body"], "We made pasta.");
}

#[tokio::test]
async fn test_create_post_without_title() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let (status, body) = request_as(
        &state,
        alice.id,
        "POST",
        "/api/posts",
        Some(json!({"body": "untitled thought"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["title"].is_null());
}

#[tokio::test]
async fn test_create_post_rejects_blank_body() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    for blank in ["", "   ", "\n\t"] {
        let (status, body) = request_as(
            &state,
            alice.id,
            "POST",
            "/api/posts",
            Some(json!({"body": blank})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Post body cannot be empty");
    }
}

#[tokio::test]
async fn test_create_post_requires_active_relationship() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    let (state, _clock) = build_app_state(db).await;

    let (status, body) = request_as(
        &state,
        alice.id,
        "POST",
        "/api/posts",
        Some(json!({"body": "into the void"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "No relationship in the required state");

    // Pending deletion blocks writing too.
    insert_relationship(
        &state.db,
        alice.id,
        ben.id,
        RelationshipStatus::PendingDeletion,
        Some(common::test_start()),
        None,
    )
    .await;
    let (status, _) = request_as(
        &state,
        alice.id,
        "POST",
        "/api/posts",
        Some(json!({"body": "still blocked"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Visibility boundary
// ============================================================================

#[tokio::test]
async fn test_posts_shared_within_relationship() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let created = create_post(&state, alice.id, "shared entry").await;
    let post_id = created["id"].as_i64().unwrap();

    // The partner reads it, both in the list and by id.
    let (status, list) = request_as(&state, ben.id, "GET", "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], post_id);

    let (status, single) = request_as(
        &state,
        ben.id,
        "GET",
        &format!("/api/posts/{}", post_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["author_id"], alice.id);
}

#[tokio::test]
async fn test_posts_invisible_outside_relationship() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    let cal = create_test_user(&db, "cal", "cal@example.com").await;
    let dee = create_test_user(&db, "dee", "dee@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    insert_relationship(&db, cal.id, dee.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let theirs = create_post(&state, alice.id, "not for cal").await;
    create_post(&state, cal.id, "cal's own").await;

    // Cal's list holds only Cal's pair's posts.
    let (_, list) = request_as(&state, cal.id, "GET", "/api/posts", None).await;
    let bodies: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["cal's own"]);

    // Fetching across the boundary looks identical to a missing post.
    let (status, body) = request_as(
        &state,
        cal.id,
        "GET",
        &format!("/api/posts/{}", theirs["id"].as_i64().unwrap()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Post not found");
}

#[tokio::test]
async fn test_unpaired_user_sees_empty_list() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let (state, _clock) = build_app_state(db).await;

    let (status, list) = request_as(&state, alice.id, "GET", "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_get_unknown_post() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let (status, _) = request_as(&state, alice.id, "GET", "/api/posts/12345", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Posts across end and resume
// ============================================================================

#[tokio::test]
async fn test_posts_hidden_during_pending_deletion() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, _clock) = build_app_state(db).await;

    let created = create_post(&state, alice.id, "before the end").await;
    let post_id = created["id"].as_i64().unwrap();

    request_as(&state, alice.id, "POST", "/api/relationship/end", None).await;

    // Hidden, not deleted: the list is empty and the id gives 404.
    let (status, list) = request_as(&state, ben.id, "GET", "/api/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));

    let (status, _) = request_as(
        &state,
        ben.id,
        "GET",
        &format!("/api/posts/{}", post_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_posts_reappear_after_resume() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, clock) = build_app_state(db).await;

    let created = create_post(&state, alice.id, "worth keeping").await;
    let post_id = created["id"].as_i64().unwrap();

    request_as(&state, alice.id, "POST", "/api/relationship/end", None).await;
    clock.advance(Duration::days(2));
    request_as(&state, alice.id, "POST", "/api/relationship/resume", None).await;
    request_as(&state, ben.id, "POST", "/api/relationship/resume", None).await;

    // The same post is back, same id.
    let (status, single) = request_as(
        &state,
        ben.id,
        "GET",
        &format!("/api/posts/{}", post_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["body"], "worth keeping");
}

// ============================================================================
// Listing order and pagination
// ============================================================================

#[tokio::test]
async fn test_list_is_newest_first_with_pagination() {
    let db = create_test_db().await;
    let alice = create_test_user(&db, "alice", "alice@example.com").await;
    let ben = create_test_user(&db, "ben", "ben@example.com").await;
    insert_relationship(&db, alice.id, ben.id, RelationshipStatus::Active, None, None).await;
    let (state, clock) = build_app_state(db).await;

    for i in 1..=5 {
        create_post(&state, alice.id, &format!("p{}", i)).await;
        clock.advance(Duration::minutes(1));
    }

    let (_, list) = request_as(&state, ben.id, "GET", "/api/posts", None).await;
    let bodies: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["p5", "p4", "p3", "p2", "p1"]);

    let (_, page) = request_as(&state, ben.id, "GET", "/api/posts?skip=1&limit=2", None).await;
    let bodies: Vec<&str> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["p4", "p3"]);
}
