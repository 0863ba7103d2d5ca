use thiserror::Error;

/// Errors produced when validating finance payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Name too long (max {max} characters)")]
    NameTooLong { max: usize },
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
    #[error("No fields to update")]
    NoFieldsToUpdate,
}
