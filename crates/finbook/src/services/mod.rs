//! Entity services.
//!
//! Thin orchestration between handlers and the (cached) repositories:
//! validate the payload, hash passwords, call the repository, translate
//! store errors into domain errors and sanitize records before they leave.

mod accounts;
mod categories;
mod error;
mod users;

pub use accounts::AccountService;
pub use categories::CategoryService;
pub use error::{Result, ServiceError};
pub use users::UserService;
