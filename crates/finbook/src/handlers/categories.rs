//! Category CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use finbook_auth::CurrentUser;
use finbook_core::api::ApiResponse;
use finbook_core::finance::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::{
    handlers::{parse_id, AppError},
    state::AppState,
};

/// Create a category owned by the caller (POST /api/categories).
pub async fn create_category(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), AppError> {
    let user_id = caller.id()?;
    let Json(request) = payload?;
    let category = state.categories.create(user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(category, "Category created successfully")),
    ))
}

/// List a user's active categories (GET /api/categories/user/{user_id}).
pub async fn list_user_categories(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<CategoryResponse>>>, AppError> {
    let user_id = parse_id(&user_id, "user")?;
    let categories = state.categories.list_by_user(user_id).await?;
    Ok(Json(ApiResponse::ok(
        categories,
        "Categories retrieved successfully",
    )))
}

/// Get a category (GET /api/categories/{id}).
pub async fn get_category(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let id = parse_id(&id, "category")?;
    let category = state.categories.get(id).await?;
    Ok(Json(ApiResponse::ok(
        category,
        "Category retrieved successfully",
    )))
}

/// Partially update a category (PUT /api/categories/{id}).
pub async fn update_category(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCategoryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CategoryResponse>>, AppError> {
    let id = parse_id(&id, "category")?;
    let Json(request) = payload?;
    let category = state.categories.update(id, request).await?;
    Ok(Json(ApiResponse::ok(category, "Category updated successfully")))
}

/// Soft-delete a category (DELETE /api/categories/{id}).
pub async fn delete_category(
    _caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "category")?;
    state.categories.delete(id).await?;
    Ok(Json(ApiResponse::message("Category deleted successfully")))
}
