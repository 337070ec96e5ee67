//! Lifecycle engine: the end, grace-period and two-party resume handshake.
//!
//! Handshake writes are conditional updates keyed on the state they expect
//! (`status`, `resume_requested_by`), so concurrent calls race on the
//! database row instead of on in-process locks. A lost race is re-read and
//! re-dispatched once; actually deleting expired rows is an external
//! sweeper's job.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Serialize;

use crate::models::prelude::*;
use crate::models::relationship;
use crate::services::error::PairingError;
use crate::services::relationships;

/// Days a pending-deletion relationship can still be resumed.
pub const GRACE_PERIOD_DAYS: i64 = 7;

/// When a pending-deletion relationship becomes permanently unresumable.
/// Always derived from `ended_at`, never stored.
pub fn deletion_deadline(rel: &relationship::Model) -> Option<DateTime<Utc>> {
    rel.ended_at
        .map(|ended| ended + Duration::days(GRACE_PERIOD_DAYS))
}

/// What a resume call accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResumeOutcome {
    /// The caller's wish is recorded; the partner must also call resume.
    PendingPartnerApproval,
    /// Both members have asked; the relationship is active again.
    Active,
}

/// End the caller's active relationship.
///
/// Unilateral: either member may end without the partner's consent. The
/// row moves to pending deletion with `ended_at = now` and any stale
/// handshake state cleared.
pub async fn end(
    db: &DatabaseConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<relationship::Model, PairingError> {
    let rel = relationships::require_active_for_user(db, user_id).await?;

    let update = relationship::ActiveModel {
        status: Set(RelationshipStatus::PendingDeletion),
        ended_at: Set(Some(now)),
        resume_requested_by: Set(None),
        resume_requested_at: Set(None),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Relationship::update_many()
        .set(update)
        .filter(relationship::Column::Id.eq(rel.id))
        .filter(relationship::Column::Status.eq(RelationshipStatus::Active))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // The partner ended it between our read and write.
        return Err(PairingError::NoActiveRelationship);
    }

    reload(db, rel.id).await
}

/// Ask to resume the caller's pending-deletion relationship.
///
/// Dispatches on `resume_requested_by`: unset means this call records the
/// wish, the caller's own id means an idempotent restatement, the
/// partner's id means this call is the approving half and completes the
/// reactivation. The grace deadline is re-evaluated on every call.
pub async fn resume(
    db: &DatabaseConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<(ResumeOutcome, relationship::Model), PairingError> {
    match try_resume(db, user_id, now).await {
        // Lost a handshake race: the row changed under us. Re-read and
        // dispatch against the new state, once.
        Err(PairingError::Conflict) => try_resume(db, user_id, now).await,
        other => other,
    }
}

async fn try_resume(
    db: &DatabaseConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<(ResumeOutcome, relationship::Model), PairingError> {
    let rel = relationships::find_pending_for_user(db, user_id)
        .await?
        .ok_or(PairingError::NoActiveRelationship)?;

    let deadline = deletion_deadline(&rel)
        .ok_or(PairingError::Invariant("pending relationship without ended_at"))?;
    if now >= deadline {
        return Err(PairingError::GracePeriodExpired);
    }

    match rel.resume_requested_by {
        None => request_resume(db, rel, user_id, now).await,
        Some(requester) if requester == user_id => {
            Ok((ResumeOutcome::PendingPartnerApproval, rel))
        }
        Some(_) => complete_resume(db, rel, now).await,
    }
}

/// First half of the handshake: record who asked.
async fn request_resume(
    db: &DatabaseConnection,
    rel: relationship::Model,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<(ResumeOutcome, relationship::Model), PairingError> {
    let update = relationship::ActiveModel {
        resume_requested_by: Set(Some(user_id)),
        resume_requested_at: Set(Some(now)),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Relationship::update_many()
        .set(update)
        .filter(relationship::Column::Id.eq(rel.id))
        .filter(relationship::Column::Status.eq(RelationshipStatus::PendingDeletion))
        .filter(relationship::Column::ResumeRequestedBy.is_null())
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(PairingError::Conflict);
    }

    let updated = reload(db, rel.id).await?;
    Ok((ResumeOutcome::PendingPartnerApproval, updated))
}

/// Second half of the handshake: the partner of the requester approves,
/// which reactivates the relationship.
///
/// Either member may have paired elsewhere since the end, so both are
/// re-checked inside the same transaction that flips the row back. Nothing
/// is written when a check fails.
async fn complete_resume(
    db: &DatabaseConnection,
    rel: relationship::Model,
    now: DateTime<Utc>,
) -> Result<(ResumeOutcome, relationship::Model), PairingError> {
    let requester = rel
        .resume_requested_by
        .ok_or(PairingError::Invariant("completing resume without a requester"))?;

    let txn = db.begin().await?;

    for member in [rel.user1_id, rel.user2_id] {
        if relationships::find_active_for_user(&txn, member)
            .await?
            .is_some()
        {
            return Err(PairingError::AlreadyPaired);
        }
    }

    let update = relationship::ActiveModel {
        status: Set(RelationshipStatus::Active),
        ended_at: Set(None),
        resume_requested_by: Set(None),
        resume_requested_at: Set(None),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Relationship::update_many()
        .set(update)
        .filter(relationship::Column::Id.eq(rel.id))
        .filter(relationship::Column::Status.eq(RelationshipStatus::PendingDeletion))
        .filter(relationship::Column::ResumeRequestedBy.eq(requester))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(PairingError::Conflict);
    }

    txn.commit().await?;

    let updated = reload(db, rel.id).await?;
    Ok((ResumeOutcome::Active, updated))
}

/// Withdraw the caller's own resume request.
pub async fn cancel_resume(
    db: &DatabaseConnection,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<relationship::Model, PairingError> {
    let rel = relationships::find_pending_for_user(db, user_id)
        .await?
        .ok_or(PairingError::NoActiveRelationship)?;

    let requester = rel.resume_requested_by.ok_or(PairingError::NoPendingResume)?;
    if requester != user_id {
        return Err(PairingError::Forbidden);
    }

    let update = relationship::ActiveModel {
        resume_requested_by: Set(None),
        resume_requested_at: Set(None),
        updated_at: Set(now),
        ..Default::default()
    };
    let result = Relationship::update_many()
        .set(update)
        .filter(relationship::Column::Id.eq(rel.id))
        .filter(relationship::Column::Status.eq(RelationshipStatus::PendingDeletion))
        .filter(relationship::Column::ResumeRequestedBy.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        // The partner completed the resume first; nothing left to cancel.
        return Err(PairingError::NoPendingResume);
    }

    reload(db, rel.id).await
}

async fn reload<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<relationship::Model, PairingError> {
    Relationship::find_by_id(id)
        .one(db)
        .await?
        .ok_or(PairingError::Invariant("relationship row disappeared"))
}
