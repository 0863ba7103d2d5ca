//! User CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use finbook_auth::CurrentUser;
use finbook_core::api::ApiResponse;
use finbook_core::finance::{CreateUserRequest, UpdateUserRequest, UserResponse};

use crate::{
    handlers::{parse_id, AppError},
    state::AppState,
};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

/// Register a user (POST /api/users/register). Public.
pub async fn register_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Created<UserResponse>, AppError> {
    let Json(request) = payload?;
    create(&state, request).await
}

/// Create a user (POST /api/users).
pub async fn create_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Created<UserResponse>, AppError> {
    let Json(request) = payload?;
    create(&state, request).await
}

async fn create(
    state: &AppState,
    request: CreateUserRequest,
) -> Result<Created<UserResponse>, AppError> {
    let user = state.users.create(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(user, "User created successfully")),
    ))
}

/// List users (GET /api/users).
pub async fn list_users(
    _caller: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(ApiResponse::ok(users, "Users retrieved successfully")))
}

/// Get a user (GET /api/users/{id}).
pub async fn get_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_id(&id, "user")?;
    let user = state.users.get(id).await?;
    Ok(Json(ApiResponse::ok(user, "User retrieved successfully")))
}

/// Partially update a user (PUT /api/users/{id}).
pub async fn update_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let id = parse_id(&id, "user")?;
    let Json(request) = payload?;
    let user = state.users.update(id, request).await?;
    Ok(Json(ApiResponse::ok(user, "User updated successfully")))
}

/// Delete a user and everything it owns (DELETE /api/users/{id}).
pub async fn delete_user(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "user")?;
    state.users.delete(id).await?;
    Ok(Json(ApiResponse::message("User deleted successfully")))
}
