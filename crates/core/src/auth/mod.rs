mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{bearer_token, calculate_expiry, is_token_expired, parse_duration};
pub use types::{Claims, LoginRequest, LoginResponse};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
