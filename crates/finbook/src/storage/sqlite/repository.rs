//! SQLite repository implementation.
//!
//! Implements the repository traits from `finbook_core::storage` on a
//! bounded `sqlx::SqlitePool`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use finbook_core::finance::{
    Account, AccountChanges, Category, CategoryChanges, NewAccount, NewCategory, NewUser, User,
    UserChanges,
};
use finbook_core::storage::{
    AccountRepository, CategoryRepository, DeletedUser, RepositoryError, Result, StoreHealth,
    UserRepository,
};

use super::conversions::{convert_rows, format_datetime, AccountRow, CategoryRow, UserRow};
use super::error::{map_sqlx_error, UniqueField};
use super::schema;

/// SQLite-based repository implementation.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Opens a pool against `url`, creating the database file if needed.
    ///
    /// At most `max_connections` connections are opened. A query that cannot
    /// get a connection within `acquire_timeout` fails with
    /// `RepositoryError::ConnectionFailed`.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_pool(pool).await
    }

    /// Creates a repository over a private in-memory database.
    ///
    /// The pool holds a single connection that is never recycled, so every
    /// query sees the same database. Useful for tests.
    pub async fn new_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        sqlx::raw_sql(schema::CREATE_TABLES)
            .execute(&pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(format!("schema init failed: {e}")))?;

        tracing::debug!("sqlite schema ready");

        Ok(Self { pool })
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&schema::select_user_by_id())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?
            .map(User::try_from)
            .transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, UserRow>(&schema::select_user_by_email())
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?
            .map(User::try_from)
            .transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&schema::select_users())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?;

        convert_rows(rows)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let now = format_datetime(&Utc::now());

        let row = sqlx::query_as::<_, UserRow>(&schema::insert_user())
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.password_hash.as_str())
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_sqlx_error(
                    e,
                    "User",
                    Some(UniqueField {
                        field: "email",
                        value: &user.email,
                    }),
                )
            })?;

        User::try_from(row)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>> {
        let now = format_datetime(&Utc::now());

        sqlx::query_as::<_, UserRow>(&schema::update_user())
            .bind(changes.name.as_deref())
            .bind(changes.email.as_deref())
            .bind(changes.password_hash.as_ref().map(|h| h.as_str()))
            .bind(&now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_sqlx_error(
                    e,
                    "User",
                    changes.email.as_deref().map(|value| UniqueField {
                        field: "email",
                        value,
                    }),
                )
            })?
            .map(User::try_from)
            .transpose()
    }

    async fn delete_user(&self, id: i64) -> Result<Option<DeletedUser>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?;

        let Some(row) = sqlx::query_as::<_, UserRow>(&schema::select_user_by_id())
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?
        else {
            return Ok(None);
        };
        // Convert before deleting: an unreadable row aborts with nothing written.
        let user = User::try_from(row)?;

        let account_ids: Vec<i64> = sqlx::query_scalar(schema::SELECT_ACCOUNT_IDS_BY_USER)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?;

        let category_ids: Vec<i64> = sqlx::query_scalar(schema::SELECT_CATEGORY_IDS_BY_USER)
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "Category", None))?;

        sqlx::query(schema::DELETE_USER)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error(e, "User", None))?;

        Ok(Some(DeletedUser {
            user,
            account_ids,
            category_ids,
        }))
    }
}

#[async_trait]
impl AccountRepository for SqliteRepository {
    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        sqlx::query_as::<_, AccountRow>(&schema::select_account_by_id())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?
            .map(Account::try_from)
            .transpose()
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&schema::select_accounts())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?;

        convert_rows(rows)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Account> {
        let now = format_datetime(&Utc::now());

        let row = sqlx::query_as::<_, AccountRow>(&schema::insert_account())
            .bind(account.user_id)
            .bind(&account.name)
            .bind(account.account_type.as_str())
            .bind(&account.currency_code)
            .bind(account.opening_balance_cents)
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?;

        Account::try_from(row)
    }

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>> {
        let now = format_datetime(&Utc::now());

        sqlx::query_as::<_, AccountRow>(&schema::update_account())
            .bind(changes.name.as_deref())
            .bind(changes.account_type.map(|t| t.as_str()))
            .bind(changes.currency_code.as_deref())
            .bind(changes.opening_balance_cents)
            .bind(&now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?
            .map(Account::try_from)
            .transpose()
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        let now = format_datetime(&Utc::now());

        let result = sqlx::query(schema::SOFT_DELETE_ACCOUNT)
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Account", None))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryRepository for SqliteRepository {
    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, CategoryRow>(&schema::select_category_by_id())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Category", None))?
            .map(Category::try_from)
            .transpose()
    }

    async fn list_categories_by_user(&self, user_id: i64) -> Result<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(&schema::select_categories_by_user())
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Category", None))?;

        convert_rows(rows)
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let now = format_datetime(&Utc::now());

        let row = sqlx::query_as::<_, CategoryRow>(&schema::insert_category())
            .bind(category.user_id)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(category.kind.as_str())
            .bind(&now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_sqlx_error(
                    e,
                    "Category",
                    Some(UniqueField {
                        field: "name",
                        value: &category.name,
                    }),
                )
            })?;

        Category::try_from(row)
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        let now = format_datetime(&Utc::now());

        sqlx::query_as::<_, CategoryRow>(&schema::update_category())
            .bind(changes.name.as_deref())
            .bind(changes.kind.map(|k| k.as_str()))
            .bind(&now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                map_sqlx_error(
                    e,
                    "Category",
                    changes.name.as_deref().map(|value| UniqueField {
                        field: "name",
                        value,
                    }),
                )
            })?
            .map(Category::try_from)
            .transpose()
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>> {
        let now = format_datetime(&Utc::now());

        sqlx::query_as::<_, CategoryRow>(&schema::soft_delete_category())
            .bind(&now)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Category", None))?
            .map(Category::try_from)
            .transpose()
    }
}

#[async_trait]
impl StoreHealth for SqliteRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query(schema::PING)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e, "Store", None))?;
        Ok(())
    }
}
