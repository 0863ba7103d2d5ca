//! In-memory repository implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use finbook_core::finance::{
    Account, AccountChanges, Category, CategoryChanges, NewAccount, NewCategory, NewUser, User,
    UserChanges,
};
use finbook_core::storage::{
    AccountRepository, CategoryRepository, DeletedUser, RepositoryError, Result, StoreHealth,
    UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    accounts: BTreeMap<i64, Account>,
    categories: BTreeMap<i64, Category>,
    next_user_id: i64,
    next_account_id: i64,
    next_category_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn active_category_name_taken(&self, user_id: i64, name: &str, except: Option<i64>) -> bool {
        self.categories.values().any(|c| {
            c.user_id == user_id && c.name == name && !c.is_deleted() && Some(c.id) != except
        })
    }

    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Newest first, ties broken by id.
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, i64)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// In-memory storage backend for development and testing.
///
/// Mirrors the SQLite backend's constraints: unique emails, unique active
/// category names per user, owner foreign keys, cascading user deletes and
/// soft-deleted accounts and categories. Data is lost when the last clone
/// is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(RepositoryError::Duplicate {
                entity_type: "User",
                field: "email",
                value: user.email.clone(),
            });
        }

        let now = Utc::now();
        let created = User {
            id: Tables::next_id(&mut tables.next_user_id),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(RepositoryError::Duplicate {
                    entity_type: "User",
                    field: "email",
                    value: email.clone(),
                });
            }
        }

        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<Option<DeletedUser>> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.remove(&id) else {
            return Ok(None);
        };

        let account_ids: Vec<i64> = tables
            .accounts
            .values()
            .filter(|a| a.user_id == id)
            .map(|a| a.id)
            .collect();
        let category_ids: Vec<i64> = tables
            .categories
            .values()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();

        for account_id in &account_ids {
            tables.accounts.remove(account_id);
        }
        for category_id in &category_ids {
            tables.categories.remove(category_id);
        }

        Ok(Some(DeletedUser {
            user,
            account_ids,
            category_ids,
        }))
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .get(&id)
            .filter(|a| !a.is_deleted())
            .cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let tables = self.tables.read().await;
        let mut accounts: Vec<Account> = tables
            .accounts
            .values()
            .filter(|a| !a.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut accounts, |a| (a.created_at, a.id));
        Ok(accounts)
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Account> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&account.user_id) {
            return Err(RepositoryError::InvalidData(
                "Foreign key constraint violation for Account".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Account {
            id: Tables::next_id(&mut tables.next_account_id),
            user_id: account.user_id,
            name: account.name.clone(),
            account_type: account.account_type,
            currency_code: account.currency_code.clone(),
            opening_balance_cents: account.opening_balance_cents,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>> {
        let mut tables = self.tables.write().await;
        let Some(account) = tables.accounts.get_mut(&id).filter(|a| !a.is_deleted()) else {
            return Ok(None);
        };

        if let Some(name) = &changes.name {
            account.name = name.clone();
        }
        if let Some(account_type) = changes.account_type {
            account.account_type = account_type;
        }
        if let Some(currency_code) = &changes.currency_code {
            account.currency_code = currency_code.clone();
        }
        if let Some(cents) = changes.opening_balance_cents {
            account.opening_balance_cents = cents;
        }
        account.updated_at = Utc::now();
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        match tables.accounts.get_mut(&id).filter(|a| !a.is_deleted()) {
            Some(account) => {
                let now = Utc::now();
                account.deleted_at = Some(now);
                account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .get(&id)
            .filter(|c| !c.is_deleted())
            .cloned())
    }

    async fn list_categories_by_user(&self, user_id: i64) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.user_id == user_id && !c.is_deleted())
            .cloned()
            .collect();
        newest_first(&mut categories, |c| (c.created_at, c.id));
        Ok(categories)
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let mut tables = self.tables.write().await;
        let parent_exists = category
            .parent_id
            .is_none_or(|parent| tables.categories.contains_key(&parent));
        if !tables.users.contains_key(&category.user_id) || !parent_exists {
            return Err(RepositoryError::InvalidData(
                "Foreign key constraint violation for Category".to_string(),
            ));
        }
        if tables.active_category_name_taken(category.user_id, &category.name, None) {
            return Err(RepositoryError::Duplicate {
                entity_type: "Category",
                field: "name",
                value: category.name.clone(),
            });
        }

        let now = Utc::now();
        let created = Category {
            id: Tables::next_id(&mut tables.next_category_id),
            user_id: category.user_id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            kind: category.kind,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(user_id) = tables
            .categories
            .get(&id)
            .filter(|c| !c.is_deleted())
            .map(|c| c.user_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            if tables.active_category_name_taken(user_id, name, Some(id)) {
                return Err(RepositoryError::Duplicate {
                    entity_type: "Category",
                    field: "name",
                    value: name.clone(),
                });
            }
        }

        let Some(category) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            category.name = name.clone();
        }
        if let Some(kind) = changes.kind {
            category.kind = kind;
        }
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        let Some(category) = tables.categories.get_mut(&id).filter(|c| !c.is_deleted()) else {
            return Ok(None);
        };

        let now = Utc::now();
        category.deleted_at = Some(now);
        category.updated_at = now;
        Ok(Some(category.clone()))
    }
}

#[async_trait]
impl StoreHealth for InMemoryRepository {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finbook_core::finance::{AccountType, CategoryKind, PasswordHash};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: PasswordHash::new("$argon2id$hash"),
        }
    }

    fn new_account(user_id: i64) -> NewAccount {
        NewAccount {
            user_id,
            name: "Main".to_string(),
            account_type: AccountType::Wallet,
            currency_code: "USD".to_string(),
            opening_balance_cents: 250,
        }
    }

    fn new_category(user_id: i64, name: &str) -> NewCategory {
        NewCategory {
            user_id,
            parent_id: None,
            name: name.to_string(),
            kind: CategoryKind::Income,
        }
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_get() {
        let repo = InMemoryRepository::new();

        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(repo.get_user(1).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.get_user_by_email("ana@example.com").await.unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_user_get_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(repo.get_user(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_duplicate_email() {
        let repo = InMemoryRepository::new();
        repo.create_user(&new_user("ana@example.com")).await.unwrap();

        let result = repo.create_user(&new_user("ana@example.com")).await;

        assert!(matches!(
            result,
            Err(RepositoryError::Duplicate {
                entity_type: "User",
                field: "email",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_user_list_newest_first() {
        let repo = InMemoryRepository::new();
        repo.create_user(&new_user("a@example.com")).await.unwrap();
        repo.create_user(&new_user("b@example.com")).await.unwrap();

        let emails: Vec<String> = repo
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();

        assert_eq!(emails, vec!["b@example.com", "a@example.com"]);
    }

    #[tokio::test]
    async fn test_user_update_keeps_own_email() {
        let repo = InMemoryRepository::new();
        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();

        let changes = UserChanges {
            name: Some("Ana Maria".to_string()),
            email: Some("ana@example.com".to_string()),
            password_hash: None,
        };
        let updated = repo.update_user(user.id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.name, "Ana Maria");
        assert!(updated.updated_at >= user.updated_at);
    }

    #[tokio::test]
    async fn test_user_update_to_taken_email() {
        let repo = InMemoryRepository::new();
        repo.create_user(&new_user("a@example.com")).await.unwrap();
        let b = repo.create_user(&new_user("b@example.com")).await.unwrap();

        let changes = UserChanges {
            email: Some("a@example.com".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            repo.update_user(b.id, &changes).await,
            Err(RepositoryError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_user_delete_cascades() {
        let repo = InMemoryRepository::new();
        let ana = repo.create_user(&new_user("ana@example.com")).await.unwrap();
        let bia = repo.create_user(&new_user("bia@example.com")).await.unwrap();
        let account = repo.create_account(&new_account(ana.id)).await.unwrap();
        let kept = repo.create_account(&new_account(bia.id)).await.unwrap();
        let category = repo
            .create_category(&new_category(ana.id, "Salary"))
            .await
            .unwrap();

        let deleted = repo.delete_user(ana.id).await.unwrap().unwrap();

        assert_eq!(deleted.account_ids, vec![account.id]);
        assert_eq!(deleted.category_ids, vec![category.id]);
        assert!(repo.get_account(account.id).await.unwrap().is_none());
        assert!(repo.get_category(category.id).await.unwrap().is_none());
        assert_eq!(repo.list_accounts().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_user_delete_nonexistent() {
        let repo = InMemoryRepository::new();
        assert!(repo.delete_user(1).await.unwrap().is_none());
    }

    // ==================== Account Tests ====================

    #[tokio::test]
    async fn test_account_requires_existing_owner() {
        let repo = InMemoryRepository::new();
        let result = repo.create_account(&new_account(9)).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_account_update_and_soft_delete() {
        let repo = InMemoryRepository::new();
        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();
        let account = repo.create_account(&new_account(user.id)).await.unwrap();

        let changes = AccountChanges {
            currency_code: Some("EUR".to_string()),
            ..Default::default()
        };
        let updated = repo
            .update_account(account.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.currency_code, "EUR");
        assert_eq!(updated.account_type, AccountType::Wallet);

        assert!(repo.delete_account(account.id).await.unwrap());
        assert!(!repo.delete_account(account.id).await.unwrap());
        assert!(repo.get_account(account.id).await.unwrap().is_none());
        assert!(repo
            .update_account(account.id, &changes)
            .await
            .unwrap()
            .is_none());
    }

    // ==================== Category Tests ====================

    #[tokio::test]
    async fn test_category_duplicate_name_is_per_user_and_active_only() {
        let repo = InMemoryRepository::new();
        let ana = repo.create_user(&new_user("ana@example.com")).await.unwrap();
        let bia = repo.create_user(&new_user("bia@example.com")).await.unwrap();

        let salary = repo
            .create_category(&new_category(ana.id, "Salary"))
            .await
            .unwrap();
        repo.create_category(&new_category(bia.id, "Salary"))
            .await
            .unwrap();
        assert!(matches!(
            repo.create_category(&new_category(ana.id, "Salary")).await,
            Err(RepositoryError::Duplicate { field: "name", .. })
        ));

        repo.delete_category(salary.id).await.unwrap().unwrap();
        repo.create_category(&new_category(ana.id, "Salary"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_category_rename_to_taken_name() {
        let repo = InMemoryRepository::new();
        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();
        repo.create_category(&new_category(user.id, "Salary"))
            .await
            .unwrap();
        let bonus = repo
            .create_category(&new_category(user.id, "Bonus"))
            .await
            .unwrap();

        let changes = CategoryChanges {
            name: Some("Salary".to_string()),
            kind: None,
        };

        assert!(matches!(
            repo.update_category(bonus.id, &changes).await,
            Err(RepositoryError::Duplicate { .. })
        ));
    }

    #[tokio::test]
    async fn test_category_list_excludes_deleted() {
        let repo = InMemoryRepository::new();
        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();
        let salary = repo
            .create_category(&new_category(user.id, "Salary"))
            .await
            .unwrap();
        let bonus = repo
            .create_category(&new_category(user.id, "Bonus"))
            .await
            .unwrap();

        let deleted = repo.delete_category(salary.id).await.unwrap().unwrap();
        assert!(deleted.is_deleted());
        assert!(repo.delete_category(salary.id).await.unwrap().is_none());

        assert_eq!(
            repo.list_categories_by_user(user.id).await.unwrap(),
            vec![bonus]
        );
    }

    #[tokio::test]
    async fn test_category_with_unknown_parent() {
        let repo = InMemoryRepository::new();
        let user = repo.create_user(&new_user("ana@example.com")).await.unwrap();

        let mut category = new_category(user.id, "Child");
        category.parent_id = Some(77);

        assert!(matches!(
            repo.create_category(&category).await,
            Err(RepositoryError::InvalidData(_))
        ));
    }
}
