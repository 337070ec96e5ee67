//! Relationship queries shared by the pairing engine, the lifecycle engine
//! and the content boundary.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::models::prelude::*;
use crate::models::relationship;
use crate::services::error::PairingError;

/// Filter matching rows where `user_id` is either member.
fn member_condition(user_id: i64) -> Condition {
    Condition::any()
        .add(relationship::Column::User1Id.eq(user_id))
        .add(relationship::Column::User2Id.eq(user_id))
}

/// The user's active relationship, if any.
///
/// The at-most-one-active invariant is maintained by the writers, so `one`
/// is enough here.
pub async fn find_active_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Option<relationship::Model>, PairingError> {
    let rel = Relationship::find()
        .filter(relationship::Column::Status.eq(RelationshipStatus::Active))
        .filter(member_condition(user_id))
        .one(db)
        .await?;
    Ok(rel)
}

/// Like [`find_active_for_user`] but an absent row is an error.
pub async fn require_active_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<relationship::Model, PairingError> {
    find_active_for_user(db, user_id)
        .await?
        .ok_or(PairingError::NoActiveRelationship)
}

/// The user's pending-deletion relationship, most recently ended first.
///
/// A user can accumulate several pending rows by pairing and ending
/// repeatedly within one grace window; resume and cancel act on the newest
/// and leave older rows for the external sweeper.
pub async fn find_pending_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Option<relationship::Model>, PairingError> {
    let rel = Relationship::find()
        .filter(relationship::Column::Status.eq(RelationshipStatus::PendingDeletion))
        .filter(member_condition(user_id))
        .order_by_desc(relationship::Column::EndedAt)
        .one(db)
        .await?;
    Ok(rel)
}

/// The relationship a user currently sees: active if one exists, otherwise
/// the newest pending-deletion row.
pub async fn find_current_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
) -> Result<Option<relationship::Model>, PairingError> {
    if let Some(rel) = find_active_for_user(db, user_id).await? {
        return Ok(Some(rel));
    }
    find_pending_for_user(db, user_id).await
}

/// Set or clear the anniversary date on the caller's active relationship.
pub async fn set_start_date<C: ConnectionTrait>(
    db: &C,
    user_id: i64,
    start_date: Option<NaiveDate>,
    now: DateTime<Utc>,
) -> Result<relationship::Model, PairingError> {
    let rel = require_active_for_user(db, user_id).await?;

    let mut active: relationship::ActiveModel = rel.into();
    active.start_date = Set(start_date);
    active.updated_at = Set(now);
    let updated = active.update(db).await?;
    Ok(updated)
}
