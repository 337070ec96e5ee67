pub mod auth;

pub use auth::require_identity;
pub use auth::AuthenticatedUser;
