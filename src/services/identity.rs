use axum::http::HeaderMap;
use thiserror::Error;

use crate::config::CONFIG;

/// Why a request could not be attributed to a user.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Missing identity header")]
    Missing,
    #[error("Malformed identity header")]
    Malformed,
}

/// Resolves the calling user's id from request headers.
///
/// Credential checks happen upstream (auth proxy / gateway); this seam only
/// maps the upstream assertion onto a user id, which the middleware then
/// loads from the database.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Result<i64, IdentityError>;
}

/// Reads the user id from a trusted reverse-proxy header.
///
/// The deployment must ensure the proxy strips this header from client
/// traffic before setting it.
#[derive(Debug, Clone)]
pub struct ProxyHeaderIdentity {
    header_name: String,
}

impl ProxyHeaderIdentity {
    pub fn new(header_name: impl Into<String>) -> Self {
        Self {
            header_name: header_name.into(),
        }
    }

    /// Provider configured from `TANDEM_IDENTITY_HEADER`.
    pub fn from_config() -> Self {
        Self::new(CONFIG.auth.identity_header.clone())
    }
}

impl IdentityProvider for ProxyHeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Result<i64, IdentityError> {
        let value = headers
            .get(&self.header_name)
            .ok_or(IdentityError::Missing)?;
        let raw = value.to_str().map_err(|_| IdentityError::Malformed)?;
        raw.trim().parse().map_err(|_| IdentityError::Malformed)
    }
}
