//! SQLite row conversion functions.
//!
//! Rows are decoded into plain structs by sqlx and converted into domain
//! types here. Enum and timestamp columns are TEXT, so conversion can fail
//! and maps to `RepositoryError::InvalidData`.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::FromRow;

use finbook_core::finance::{Account, AccountType, Category, CategoryKind, PasswordHash, User};
use finbook_core::storage::RepositoryError;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub account_type: String,
    pub currency_code: String,
    pub opening_balance_cents: i64,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub user_id: i64,
    pub parent_id: Option<i64>,
    pub name: String,
    pub kind: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Formats a timestamp for storage.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("invalid timestamp '{s}': {e}")))
}

fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, RepositoryError> {
    s.map(parse_datetime).transpose()
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: PasswordHash::new(row.password_hash),
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_type = AccountType::parse(&row.account_type).ok_or_else(|| {
            RepositoryError::InvalidData(format!("unknown account type '{}'", row.account_type))
        })?;

        Ok(Account {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            account_type,
            currency_code: row.currency_code,
            opening_balance_cents: row.opening_balance_cents,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            deleted_at: parse_optional_datetime(row.deleted_at.as_deref())?,
        })
    }
}

impl TryFrom<CategoryRow> for Category {
    type Error = RepositoryError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        let kind = CategoryKind::parse(&row.kind).ok_or_else(|| {
            RepositoryError::InvalidData(format!("unknown category kind '{}'", row.kind))
        })?;

        Ok(Category {
            id: row.id,
            user_id: row.user_id,
            parent_id: row.parent_id,
            name: row.name,
            kind,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
            deleted_at: parse_optional_datetime(row.deleted_at.as_deref())?,
        })
    }
}

/// Converts every row, failing on the first invalid one.
pub fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, RepositoryError>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter().map(T::try_from).collect()
}
