use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::services::{Clock, IdentityProvider, ProxyHeaderIdentity, SystemClock};

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state containing all shared resources
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub identity: Arc<dyn IdentityProvider>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: DbConn) -> Self {
        Self::with_parts(
            db,
            Arc::new(ProxyHeaderIdentity::from_config()),
            Arc::new(SystemClock),
        )
    }

    /// Build a state from explicit parts. Tests swap in a manual clock and
    /// a fixed identity header this way.
    pub fn with_parts(
        db: DbConn,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            identity,
            clock,
        }
    }

    /// Current time as observed by the application clock.
    pub fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }
}
