use thiserror::Error;

/// Domain outcomes of the invitation, pairing and lifecycle operations.
///
/// Expected rejections are plain variants; callers match on them or let the
/// application layer translate them into HTTP statuses. `Store`, `Conflict`
/// and `Invariant` are the unexpected kinds.
#[derive(Debug, Error)]
pub enum PairingError {
    #[error("user already has an active relationship")]
    AlreadyPaired,

    #[error("invitation code not found")]
    InvitationNotFound,

    #[error("cannot accept your own invitation")]
    SelfAccept,

    #[error("invitation creator already has an active relationship")]
    CreatorAlreadyPaired,

    #[error("no relationship in the required state")]
    NoActiveRelationship,

    #[error("no pending resume request")]
    NoPendingResume,

    #[error("grace period has expired")]
    GracePeriodExpired,

    #[error("only the requesting user may do this")]
    Forbidden,

    #[error("could not generate an unused invite code")]
    GenerationExhausted,

    #[error("conflicting concurrent update")]
    Conflict,

    #[error("relationship state is inconsistent: {0}")]
    Invariant(&'static str),

    #[error(transparent)]
    Store(#[from] sea_orm::DbErr),
}
