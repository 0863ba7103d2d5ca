//! HTTP handlers for auth routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use chrono::Utc;

use finbook_core::api::ApiResponse;
use finbook_core::auth::{AuthError as CoreError, LoginRequest, LoginResponse};
use finbook_core::finance::summarize_user;

use crate::error::AuthError;
use crate::password::verify_password;
use crate::tokens::issue_token;
use crate::AuthState;

/// Creates the auth router.
///
/// Routes:
/// - `POST /api/users/login` - Exchange email and password for a token
pub fn auth_routes() -> Router<AuthState> {
    Router::new().route("/api/users/login", post(login))
}

/// Unknown email and wrong password produce the same error.
async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, AuthError> {
    let Json(request) = payload.map_err(|e| AuthError::InvalidBody(e.body_text()))?;
    let user = state
        .users
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or_else(|| {
            tracing::debug!(email = %request.email, "login for unknown email");
            CoreError::InvalidCredentials
        })?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = user.id, "password mismatch");
        return Err(CoreError::InvalidCredentials.into());
    }

    let summary = summarize_user(&user);
    let issued = issue_token(&state.config, &summary, Utc::now())?;

    tracing::info!(user_id = user.id, "user logged in");

    Ok(Json(ApiResponse::ok(
        LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user: summary,
        },
        "Login successful",
    )))
}
