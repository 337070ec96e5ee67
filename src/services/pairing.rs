//! Pairing engine: turns an accepted invitation into an active relationship.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};

use crate::models::prelude::*;
use crate::models::relationship;
use crate::services::error::PairingError;
use crate::services::{invitations, relationships};

/// Accept the invitation identified by `code` on behalf of
/// `accepting_user_id`.
///
/// Preconditions are checked in a fixed order, first failure wins:
/// the accepter is unpaired, the code exists, the code is not the
/// accepter's own, the creator is still unpaired. The relationship insert
/// and the invitation delete share one transaction, and the paired-state
/// guards run inside it, so a concurrent accept of the same or a competing
/// code cannot leave either user in two active relationships.
pub async fn accept_invitation(
    db: &DatabaseConnection,
    code: &str,
    accepting_user_id: i64,
    now: DateTime<Utc>,
) -> Result<relationship::Model, PairingError> {
    let txn = db.begin().await?;

    if relationships::find_active_for_user(&txn, accepting_user_id)
        .await?
        .is_some()
    {
        return Err(PairingError::AlreadyPaired);
    }

    let inv = invitations::validate(&txn, code, Some(accepting_user_id)).await?;

    let rel = relationship::ActiveModel {
        user1_id: Set(inv.created_by_id),
        user2_id: Set(accepting_user_id),
        status: Set(RelationshipStatus::Active),
        start_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    invitations::consume(&txn, inv.id).await?;

    txn.commit().await?;
    Ok(rel)
}
