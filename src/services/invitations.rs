//! Invitation registry: issue, look up, validate and consume single-use
//! invite codes.

use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::models::invitation;
use crate::models::prelude::*;
use crate::services::error::PairingError;
use crate::services::relationships;

/// Characters allowed in invite codes. Ambiguous glyphs (I, O, 0, 1) are
/// excluded so codes survive being read aloud or copied by hand.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated invite code.
pub const CODE_LENGTH: usize = 8;

/// Collisions tolerated before code generation gives up.
pub const MAX_CODE_ATTEMPTS: usize = 10;

/// Generate a random invite code. Uniqueness is checked against the store
/// by the caller.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Issue a fresh invitation for `creator_id`, replacing any previous one.
///
/// The delete and insert share a transaction so the creator never ends up
/// with zero or two live codes.
pub async fn create_invitation(
    db: &DatabaseConnection,
    creator_id: i64,
    now: DateTime<Utc>,
) -> Result<invitation::Model, PairingError> {
    let txn = db.begin().await?;

    if relationships::find_active_for_user(&txn, creator_id)
        .await?
        .is_some()
    {
        return Err(PairingError::AlreadyPaired);
    }

    Invitation::delete_many()
        .filter(invitation::Column::CreatedById.eq(creator_id))
        .exec(&txn)
        .await?;

    let code = unused_code(&txn).await?;
    let created = invitation::ActiveModel {
        code: Set(code),
        created_by_id: Set(creator_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Return the creator's live invitation, creating one if none exists.
pub async fn get_or_create(
    db: &DatabaseConnection,
    creator_id: i64,
    now: DateTime<Utc>,
) -> Result<invitation::Model, PairingError> {
    if relationships::find_active_for_user(db, creator_id)
        .await?
        .is_some()
    {
        return Err(PairingError::AlreadyPaired);
    }

    let existing = Invitation::find()
        .filter(invitation::Column::CreatedById.eq(creator_id))
        .order_by_desc(invitation::Column::CreatedAt)
        .one(db)
        .await?;

    match existing {
        Some(inv) => Ok(inv),
        None => create_invitation(db, creator_id, now).await,
    }
}

/// Check that `code` is live and acceptable, returning the invitation.
///
/// Codes compare case-insensitively. Rejections, in order: the code does
/// not exist, the accepting user created it, the creator has since paired
/// through another code. Invitations never expire on their own; only
/// replacement or consumption removes them.
pub async fn validate<C: ConnectionTrait>(
    db: &C,
    code: &str,
    accepting_user_id: Option<i64>,
) -> Result<invitation::Model, PairingError> {
    let normalized = code.trim().to_uppercase();

    let inv = Invitation::find()
        .filter(invitation::Column::Code.eq(&normalized))
        .one(db)
        .await?
        .ok_or(PairingError::InvitationNotFound)?;

    if accepting_user_id == Some(inv.created_by_id) {
        return Err(PairingError::SelfAccept);
    }

    if relationships::find_active_for_user(db, inv.created_by_id)
        .await?
        .is_some()
    {
        return Err(PairingError::CreatorAlreadyPaired);
    }

    Ok(inv)
}

/// Hard-delete a consumed invitation. Deleting an id that is already gone
/// is not an error at this layer.
pub async fn consume<C: ConnectionTrait>(db: &C, invitation_id: i64) -> Result<(), PairingError> {
    Invitation::delete_by_id(invitation_id).exec(db).await?;
    Ok(())
}

/// Draw codes until one is unused, giving up after [`MAX_CODE_ATTEMPTS`].
async fn unused_code<C: ConnectionTrait>(db: &C) -> Result<String, PairingError> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_code();
        let taken = Invitation::find()
            .filter(invitation::Column::Code.eq(&code))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
    }
    Err(PairingError::GenerationExhausted)
}
