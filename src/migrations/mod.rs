pub use sea_orm_migration::prelude::*;

mod m20260410_000001_create_users;
mod m20260410_000002_create_invitations;
mod m20260410_000003_create_relationships;
mod m20260410_000004_create_posts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260410_000001_create_users::Migration),
            Box::new(m20260410_000002_create_invitations::Migration),
            Box::new(m20260410_000003_create_relationships::Migration),
            Box::new(m20260410_000004_create_posts::Migration),
        ]
    }
}
