use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An argon2 PHC string for a user's password.
///
/// The hash is part of the stored record (and of its cache shadow) but never
/// of any response type. `Debug` is redacted so it cannot end up in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// A user as stored in the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The kind of money container an account represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Wallet,
    #[default]
    Current,
    Savings,
}

impl AccountType {
    /// Returns the storage representation of this account type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Wallet => "wallet",
            AccountType::Current => "current",
            AccountType::Savings => "savings",
        }
    }

    /// Parses the storage representation of an account type.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "wallet" => Some(AccountType::Wallet),
            "current" => Some(AccountType::Current),
            "savings" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A money account owned by a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// ISO-4217 currency code.
    pub currency_code: String,
    /// Opening balance in minor units (cents).
    pub opening_balance_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Returns true if the account carries a soft-delete marker.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Whether a category classifies money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    /// Returns the storage representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    /// Parses the storage representation of a kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-defined income or expense category.
///
/// Categories may nest through `parent_id`; acyclicity is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: CategoryKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Returns true if the category carries a soft-delete marker.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret");
        let debug = format!("{hash:?}");
        assert!(!debug.contains("secret"));
        assert_eq!(debug, "PasswordHash(<redacted>)");
    }

    #[test]
    fn test_account_type_round_trips_through_storage_string() {
        for ty in [AccountType::Wallet, AccountType::Current, AccountType::Savings] {
            assert_eq!(AccountType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(AccountType::parse("checking"), None);
    }

    #[test]
    fn test_account_type_defaults_to_current() {
        assert_eq!(AccountType::default(), AccountType::Current);
    }

    #[test]
    fn test_category_kind_serde_is_lowercase() {
        let json = serde_json::to_string(&CategoryKind::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
        let kind: CategoryKind = serde_json::from_str("\"income\"").unwrap();
        assert_eq!(kind, CategoryKind::Income);
    }

    #[test]
    fn test_account_serializes_type_field() {
        let now = Utc::now();
        let account = Account {
            id: 1,
            user_id: 2,
            name: "Wallet".to_string(),
            account_type: AccountType::Wallet,
            currency_code: "BRL".to_string(),
            opening_balance_cents: 1050,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["type"], "wallet");
        assert!(!account.is_deleted());
    }
}
