mod error;
mod requests;
mod sanitize;
mod types;
mod validation;

pub use error::ValidationError;
pub use requests::{
    AccountChanges, CategoryChanges, CreateAccountRequest, CreateCategoryRequest,
    CreateUserRequest, NewAccount, NewCategory, NewUser, UpdateAccountRequest,
    UpdateCategoryRequest, UpdateUserRequest, UserChanges, DEFAULT_ACCOUNT_NAME,
    DEFAULT_CURRENCY_CODE,
};
pub use sanitize::{
    sanitize_account, sanitize_accounts, sanitize_categories, sanitize_category, sanitize_user,
    sanitize_users, summarize_user, AccountResponse, CategoryResponse, UserResponse, UserSummary,
};
pub use types::{Account, AccountType, Category, CategoryKind, PasswordHash, User};
pub use validation::{
    validate_create_account, validate_create_category, validate_create_user,
    validate_currency_code, validate_email, validate_name, validate_password,
    validate_update_account, validate_update_category, validate_update_user, MAX_NAME_LENGTH,
    MIN_PASSWORD_LENGTH,
};
