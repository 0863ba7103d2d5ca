//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;

use finbook_core::auth::{bearer_token, AuthError as CoreError, Claims};

use crate::error::AuthError;
use crate::tokens::verify_token;
use crate::AuthState;

/// Claims of the authenticated caller. Rejects with 401 otherwise.
///
/// Only the token is checked; the user is not looked up.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    /// The caller's user id.
    pub fn id(&self) -> Result<i64, AuthError> {
        self.0
            .user_id()
            .ok_or_else(|| CoreError::InvalidToken("subject is not a user id".to_string()).into())
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(CoreError::MissingToken)?
            .to_str()
            .map_err(|_| CoreError::InvalidToken("invalid authorization header".to_string()))?;

        let token = bearer_token(header_value)?;
        let claims = verify_token(&auth_state.config, token, Utc::now())?;

        Ok(CurrentUser(claims))
    }
}
