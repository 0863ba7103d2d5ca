pub mod accounts;
pub mod categories;
pub mod error;
pub mod fallback;
pub mod health;
pub mod users;

pub use error::{parse_id, AppError};
