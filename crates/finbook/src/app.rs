use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use finbook_auth::auth_routes;

use crate::{
    handlers::{
        accounts::{create_account, delete_account, get_account, list_accounts, update_account},
        categories::{
            create_category, delete_category, get_category, list_user_categories,
            update_category,
        },
        fallback::not_found,
        health::health,
        users::{create_user, delete_user, get_user, list_users, register_user, update_user},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    // Everything except register requires a bearer token (see `CurrentUser`).
    let api_routes = Router::new()
        // User routes
        .route("/users", get(list_users).post(create_user))
        .route("/users/register", post(register_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        // Account routes
        .route("/accounts", get(list_accounts))
        .route("/accounts/create/{user_id}", post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        // Category routes
        .route("/categories", post(create_category))
        .route("/categories/user/{user_id}", get(list_user_categories))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        );

    let auth = auth_routes().with_state(state.auth.clone());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(auth)
        .fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}
