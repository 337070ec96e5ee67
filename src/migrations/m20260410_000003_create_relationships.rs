//! Migration: Create relationships table

use sea_orm_migration::prelude::*;

use super::m20260410_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Relationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Relationships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Relationships::User1Id)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::User2Id)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::Status)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Relationships::StartDate).date().null())
                    .col(
                        ColumnDef::new(Relationships::EndedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::ResumeRequestedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::ResumeRequestedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Relationships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Relationships::Table, Relationships::User1Id)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Relationships::Table, Relationships::User2Id)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_user1")
                    .table(Relationships::Table)
                    .col(Relationships::User1Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_user2")
                    .table(Relationships::Table)
                    .col(Relationships::User2Id)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_relationships_status")
                    .table(Relationships::Table)
                    .col(Relationships::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Relationships::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Relationships {
    Table,
    Id,
    #[iden = "user1_id"]
    User1Id,
    #[iden = "user2_id"]
    User2Id,
    Status,
    #[iden = "start_date"]
    StartDate,
    #[iden = "ended_at"]
    EndedAt,
    #[iden = "resume_requested_by"]
    ResumeRequestedBy,
    #[iden = "resume_requested_at"]
    ResumeRequestedAt,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
