//! Request payloads and store inputs for finance operations.
//!
//! The `*Request` types are what HTTP clients send. The `New*` and `*Changes`
//! types are what the primary store receives once a service has validated the
//! request (and hashed any password).

use serde::{Deserialize, Serialize};

use super::types::{AccountType, CategoryKind, PasswordHash};

/// Name given to accounts created without one.
pub const DEFAULT_ACCOUNT_NAME: &str = "New Account";

/// Currency assigned to accounts created without one.
pub const DEFAULT_CURRENCY_CODE: &str = "BRL";

/// Request payload for creating (registering) a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request payload for a partial user update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Returns true if no field was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

/// Request payload for creating an account. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance_cents: Option<i64>,
}

impl CreateAccountRequest {
    /// Fills in defaults and binds the account to its owner.
    pub fn into_new_account(self, user_id: i64) -> NewAccount {
        NewAccount {
            user_id,
            name: self
                .name
                .unwrap_or_else(|| DEFAULT_ACCOUNT_NAME.to_string()),
            account_type: self.account_type.unwrap_or_default(),
            currency_code: self
                .currency_code
                .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string()),
            opening_balance_cents: self.opening_balance_cents.unwrap_or(0),
        }
    }
}

/// Request payload for a partial account update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_balance_cents: Option<i64>,
}

impl UpdateAccountRequest {
    /// Returns true if no field was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account_type.is_none()
            && self.currency_code.is_none()
            && self.opening_balance_cents.is_none()
    }

    /// Converts the request into store changes.
    pub fn into_changes(self) -> AccountChanges {
        AccountChanges {
            name: self.name,
            account_type: self.account_type,
            currency_code: self.currency_code,
            opening_balance_cents: self.opening_balance_cents,
        }
    }
}

/// Request payload for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Request payload for a partial category update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CategoryKind>,
}

impl UpdateCategoryRequest {
    /// Returns true if no field was provided.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none()
    }

    /// Converts the request into store changes.
    pub fn into_changes(self) -> CategoryChanges {
        CategoryChanges {
            name: self.name,
            kind: self.kind,
        }
    }
}

/// A validated user ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
}

/// Fields to change on an existing user. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<PasswordHash>,
}

impl UserChanges {
    /// Returns true if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

/// A validated account ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user_id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub currency_code: String,
    pub opening_balance_cents: i64,
}

/// Fields to change on an existing account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub currency_code: Option<String>,
    pub opening_balance_cents: Option<i64>,
}

impl AccountChanges {
    /// Returns true if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.account_type.is_none()
            && self.currency_code.is_none()
            && self.opening_balance_cents.is_none()
    }
}

/// A validated category ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: CategoryKind,
}

/// Fields to change on an existing category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
}

impl CategoryChanges {
    /// Returns true if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.kind.is_none()
    }
}
