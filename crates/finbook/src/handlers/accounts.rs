//! Account CRUD handlers.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use finbook_auth::CurrentUser;
use finbook_core::api::ApiResponse;
use finbook_core::finance::{AccountResponse, CreateAccountRequest, UpdateAccountRequest};

use crate::{
    handlers::{parse_id, AppError},
    state::AppState,
};

/// An empty body means "all defaults".
fn parse_create_body(body: &Bytes) -> Result<CreateAccountRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateAccountRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::bad_request("Invalid request body", e.to_string()))
}

/// Open an account for a user (POST /api/accounts/create/{user_id}).
pub async fn create_account(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let request = parse_create_body(&body)?;
    let account = state.accounts.create(user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(account, "Account created successfully")),
    ))
}

/// List active accounts (GET /api/accounts).
pub async fn list_accounts(
    _caller: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, AppError> {
    let accounts = state.accounts.list().await?;
    Ok(Json(ApiResponse::ok(
        accounts,
        "Accounts retrieved successfully",
    )))
}

/// Get an account (GET /api/accounts/{id}).
pub async fn get_account(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let id = parse_id(&id, "account")?;
    let account = state.accounts.get(id).await?;
    Ok(Json(ApiResponse::ok(account, "Account retrieved successfully")))
}

/// Partially update an account (PUT /api/accounts/{id}).
pub async fn update_account(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AccountResponse>>, AppError> {
    let id = parse_id(&id, "account")?;
    let Json(request) = payload?;
    let account = state.accounts.update(id, request).await?;
    Ok(Json(ApiResponse::ok(account, "Account updated successfully")))
}

/// Soft-delete an account (DELETE /api/accounts/{id}).
pub async fn delete_account(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "account")?;
    state.accounts.delete(id).await?;
    Ok(Json(ApiResponse::message("Account deleted successfully")))
}
