use chrono::Duration;

use finbook_core::auth::parse_duration;

use crate::error::AuthError;

/// Default token lifetime when `JWT_EXPIRES_IN` is unset.
pub const DEFAULT_TOKEN_TTL: &str = "12h";

/// Token signing configuration.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AuthConfig {
    /// Creates a configuration, rejecting an empty secret.
    pub fn new(jwt_secret: impl Into<String>, token_ttl: Duration) -> Result<Self, AuthError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.trim().is_empty() {
            return Err(AuthError::Config("JWT_SECRET must not be empty".to_string()));
        }
        Ok(Self {
            jwt_secret,
            token_ttl,
        })
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HS256 signing secret (required)
    /// - `JWT_EXPIRES_IN`: token lifetime such as `30m`, `12h` or `7d` (default: `12h`)
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` if the secret is missing or the lifetime
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, AuthError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET is not set".to_string()))?;

        let ttl = std::env::var("JWT_EXPIRES_IN").unwrap_or_else(|_| DEFAULT_TOKEN_TTL.to_string());
        let token_ttl =
            parse_duration(&ttl).map_err(|e| AuthError::Config(format!("JWT_EXPIRES_IN: {e}")))?;

        Self::new(secret, token_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_is_rejected() {
        assert!(matches!(
            AuthConfig::new("  ", Duration::hours(1)),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new("super-secret", Duration::hours(1)).unwrap();
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
