//! Projections of stored records into client-facing shapes.
//!
//! Every response type lists its fields explicitly. A field added to a stored
//! record does not reach clients until it is added here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Account, AccountType, Category, CategoryKind, User};

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal user identity embedded in login responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// An account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub currency_code: String,
    pub opening_balance_cents: i64,
}

/// A category as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn sanitize_user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn summarize_user(user: &User) -> UserSummary {
    UserSummary {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

pub fn sanitize_users(users: &[User]) -> Vec<UserResponse> {
    users.iter().map(sanitize_user).collect()
}

pub fn sanitize_account(account: &Account) -> AccountResponse {
    AccountResponse {
        id: account.id,
        user_id: account.user_id,
        name: account.name.clone(),
        account_type: account.account_type,
        currency_code: account.currency_code.clone(),
        opening_balance_cents: account.opening_balance_cents,
    }
}

pub fn sanitize_accounts(accounts: &[Account]) -> Vec<AccountResponse> {
    accounts.iter().map(sanitize_account).collect()
}

pub fn sanitize_category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        user_id: category.user_id,
        parent_id: category.parent_id,
        name: category.name.clone(),
        kind: category.kind,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub fn sanitize_categories(categories: &[Category]) -> Vec<CategoryResponse> {
    categories.iter().map(sanitize_category).collect()
}
