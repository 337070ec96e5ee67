//! Test helpers and utilities for unit and integration testing.
//!
//! Shared setup for in-memory databases, fixture users and relationship
//! rows, plus a request helper that drives the router with the identity
//! header a fronting proxy would set.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use tower::util::ServiceExt;

use tandem::migrations::Migrator;
use tandem::models::prelude::RelationshipStatus;
use tandem::models::{relationship, user};
use tandem::services::{ManualClock, ProxyHeaderIdentity};
use tandem::state::AppState;

/// Header the tests use to impersonate the fronting proxy.
pub const IDENTITY_HEADER: &str = "x-tandem-user";

/// Fixed instant every manual test clock starts from.
pub fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
}

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> DatabaseConnection {
    // Simple in-memory SQLite - each connection gets its own database
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run test migrations");

    db
}

/// Create a test user and return the user model
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
) -> user::Model {
    let now = Utc::now();

    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_user.insert(db).await.unwrap()
}

/// Insert a relationship row in the given state
pub async fn insert_relationship(
    db: &DatabaseConnection,
    user1_id: i64,
    user2_id: i64,
    status: RelationshipStatus,
    ended_at: Option<DateTime<Utc>>,
    resume_requested_by: Option<i64>,
) -> relationship::Model {
    let now = Utc::now();

    let new_rel = relationship::ActiveModel {
        user1_id: Set(user1_id),
        user2_id: Set(user2_id),
        status: Set(status),
        start_date: Set(None),
        ended_at: Set(ended_at),
        resume_requested_by: Set(resume_requested_by),
        resume_requested_at: Set(resume_requested_by.map(|_| now)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_rel.insert(db).await.unwrap()
}

/// Build an application state around a manual clock and the test identity
/// provider. Returns the clock so tests can move time.
pub async fn build_app_state(db: DatabaseConnection) -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_start()));
    let state = AppState::with_parts(
        db,
        Arc::new(ProxyHeaderIdentity::new(IDENTITY_HEADER)),
        clock.clone(),
    );
    (state, clock)
}

/// Send one request through a fresh router as `user_id` and return
/// (status, parsed JSON body). A non-JSON body parses as JSON null.
pub async fn request_as(
    state: &AppState,
    user_id: i64,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let app = tandem::endpoints::create_router(state.clone());

    let builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(IDENTITY_HEADER, user_id.to_string());

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
