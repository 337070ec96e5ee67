pub mod invitation;
pub mod post;
pub mod relationship;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::invitation::{self, Entity as Invitation};
    pub use super::post::{self, Entity as Post};
    pub use super::relationship::{self, Entity as Relationship, RelationshipStatus};
    pub use super::user::{self, Entity as User};
}
