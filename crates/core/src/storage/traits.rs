use async_trait::async_trait;

use crate::finance::{
    Account, AccountChanges, Category, CategoryChanges, NewAccount, NewCategory, NewUser, User,
    UserChanges,
};

use super::{DeletedUser, Result};

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists all users, newest first.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Creates a new user. Fails with `Duplicate` if the email is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Applies changes to a user. Returns `None` if the user does not exist.
    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>>;

    /// Hard-deletes a user together with everything it owns.
    async fn delete_user(&self, id: i64) -> Result<Option<DeletedUser>>;
}

/// Repository for account operations. Soft-deleted accounts are invisible.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_account(&self, id: i64) -> Result<Option<Account>>;

    /// Lists all active accounts, newest first.
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    async fn create_account(&self, account: &NewAccount) -> Result<Account>;

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>>;

    /// Soft-deletes an account. Returns `false` if no active account matched.
    async fn delete_account(&self, id: i64) -> Result<bool>;
}

/// Repository for category operations. Soft-deleted categories are invisible.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn get_category(&self, id: i64) -> Result<Option<Category>>;

    /// Lists the active categories of a user, newest first.
    async fn list_categories_by_user(&self, user_id: i64) -> Result<Vec<Category>>;

    /// Creates a category. Fails with `Duplicate` if the user already has a
    /// category with the same name.
    async fn create_category(&self, category: &NewCategory) -> Result<Category>;

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>>;

    /// Soft-deletes a category, returning the record as it was marked.
    async fn delete_category(&self, id: i64) -> Result<Option<Category>>;
}

/// Liveness probe for the primary store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
