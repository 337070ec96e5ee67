use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a relationship.
///
/// `resume_requested_by` layers the two-party resume handshake on top of
/// `PendingDeletion`; it is not a third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum RelationshipStatus {
    #[sea_orm(string_value = "active")]
    #[serde(rename = "active")]
    Active,
    #[sea_orm(string_value = "pending_deletion")]
    #[serde(rename = "pending_deletion")]
    PendingDeletion,
}

impl std::fmt::Display for RelationshipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipStatus::Active => write!(f, "active"),
            RelationshipStatus::PendingDeletion => write!(f, "pending_deletion"),
        }
    }
}

/// Exclusive pair of accounts plus its lifecycle state.
///
/// Invariants enforced by the services layer, not the schema:
/// each user appears in at most one `Active` row, `user1_id != user2_id`,
/// `ended_at` is set iff status is `PendingDeletion`, and
/// `resume_requested_by` is always one of the two members.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "relationships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub status: RelationshipStatus,
    /// Optional anniversary date the pair can set once active.
    pub start_date: Option<Date>,
    pub ended_at: Option<DateTimeUtc>,
    pub resume_requested_by: Option<i64>,
    pub resume_requested_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Whether `user_id` is one of the two members.
    pub fn is_member(&self, user_id: i64) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The other member's id, or `None` when `user_id` is not a member.
    pub fn partner_of(&self, user_id: i64) -> Option<i64> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User1Id",
        to = "super::user::Column::Id"
    )]
    User1,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::User2Id",
        to = "super::user::Column::Id"
    )]
    User2,
    #[sea_orm(has_many = "super::post::Entity")]
    Posts,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
