//! HS256 token issuing and verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use finbook_core::auth::{is_token_expired, AuthError as CoreError, Claims};
use finbook_core::finance::UserSummary;

use crate::config::AuthConfig;
use crate::error::AuthError;

/// A signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs a token for `user` valid from `now` for the configured lifetime.
pub fn issue_token(
    config: &AuthConfig,
    user: &UserSummary,
    now: DateTime<Utc>,
) -> Result<IssuedToken, AuthError> {
    let claims = Claims::for_user(user, now, config.token_ttl);
    let expires_at = DateTime::from_timestamp(claims.exp, 0)
        .ok_or_else(|| AuthError::Config("token lifetime out of range".to_string()))?;

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AuthError::Password(format!("token signing failed: {e}")))?;

    Ok(IssuedToken { token, expires_at })
}

/// Verifies the signature and expiry of `token` and returns its claims.
pub fn verify_token(
    config: &AuthConfig,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => CoreError::TokenExpired,
        _ => CoreError::InvalidToken(e.to_string()),
    })?;

    if is_token_expired(data.claims.exp, now) {
        return Err(CoreError::TokenExpired.into());
    }
    if data.claims.user_id().is_none() {
        return Err(CoreError::InvalidToken("subject is not a user id".to_string()).into());
    }

    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig::new(secret, Duration::hours(12)).unwrap()
    }

    fn ana() -> UserSummary {
        UserSummary {
            id: 42,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let config = config("secret");
        let now = Utc::now();

        let issued = issue_token(&config, &ana(), now).unwrap();
        let claims = verify_token(&config, &issued.token, now).unwrap();

        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(issued.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let now = Utc::now();
        let issued = issue_token(&config("secret"), &ana(), now).unwrap();

        let result = verify_token(&config("other"), &issued.token, now);

        assert!(matches!(
            result,
            Err(AuthError::Core(CoreError::InvalidToken(_)))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = AuthConfig::new("secret", Duration::seconds(1)).unwrap();
        let issued_at = Utc::now() - Duration::hours(1);
        let issued = issue_token(&config, &ana(), issued_at).unwrap();

        let result = verify_token(&config, &issued.token, Utc::now());

        assert!(matches!(result, Err(AuthError::Core(CoreError::TokenExpired))));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let result = verify_token(&config("secret"), "not-a-jwt", Utc::now());
        assert!(matches!(
            result,
            Err(AuthError::Core(CoreError::InvalidToken(_)))
        ));
    }
}
