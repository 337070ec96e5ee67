use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Header carrying the authenticated user id, set by the fronting proxy.
    pub identity_header: String,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            identity_header: env::var("TANDEM_IDENTITY_HEADER")
                .unwrap_or_else(|_| "x-tandem-user".to_string()),
        }
    }
}
