//! Test helpers and utilities for unit testing.
//!
//! Shared setup for in-memory databases and fixture rows used by the
//! `#[cfg(test)]` modules across the crate.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::migrations::Migrator;
use crate::models::prelude::RelationshipStatus;
use crate::models::{relationship, user};

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
