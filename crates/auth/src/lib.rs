//! JWT authentication for finbook.
//!
//! This crate provides:
//! - HS256 token issuing and verification
//! - argon2id password hashing on the blocking pool
//! - An axum extractor for authenticated requests
//! - The public login route

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod tokens;

pub use config::AuthConfig;
pub use error::AuthError;
pub use extractors::CurrentUser;
pub use handlers::auth_routes;
pub use password::{hash_password, verify_password};
pub use state::AuthState;
pub use tokens::{issue_token, verify_token, IssuedToken};
