use axum::{
    http::{StatusCode, Uri},
    Json,
};

use finbook_core::api::ApiResponse;

/// Catch-all for unknown routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(
            format!("Route {} not found", uri.path()),
            Some("The requested resource was not found".to_string()),
        )),
    )
}
