//! Cached account repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use finbook_core::cache::{account_key, accounts_collection_key, Cache};
use finbook_core::finance::{Account, AccountChanges, NewAccount};
use finbook_core::storage::{AccountRepository, Result};

use super::aside::{run_to_completion, should_invalidate, CacheAside};

/// Cached account repository decorator.
///
/// Serves `accounts:<id>` and `accounts:all` cache-aside and invalidates
/// both after every write to the account.
pub struct CachedAccountRepository<R, C>
where
    R: AccountRepository,
    C: Cache,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
}

impl<R, C> CachedAccountRepository<R, C>
where
    R: AccountRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, aside: CacheAside<C>) -> Self {
        Self { repository, aside }
    }
}

fn account_keys(id: i64) -> Vec<String> {
    vec![account_key(id), accounts_collection_key()]
}

#[async_trait]
impl<R, C> AccountRepository for CachedAccountRepository<R, C>
where
    R: AccountRepository + 'static,
    C: Cache + 'static,
{
    async fn get_account(&self, id: i64) -> Result<Option<Account>> {
        self.aside
            .get_or_load(&account_key(id), self.repository.get_account(id))
            .await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.aside
            .get_or_load_list(&accounts_collection_key(), self.repository.list_accounts())
            .await
    }

    async fn create_account(&self, account: &NewAccount) -> Result<Account> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let account = account.clone();

        run_to_completion(async move {
            let result = repository.create_account(&account).await;
            match &result {
                Ok(created) => {
                    aside.invalidate(&account_keys(created.id)).await;
                    tracing::debug!(
                        account_id = created.id,
                        user_id = created.user_id,
                        "Account created"
                    );
                }
                Err(err) if err.may_have_written() => {
                    aside.invalidate(&[accounts_collection_key()]).await;
                }
                Err(_) => {}
            }
            result
        })
        .await
    }

    async fn update_account(&self, id: i64, changes: &AccountChanges) -> Result<Option<Account>> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let changes = changes.clone();

        run_to_completion(async move {
            let result = repository.update_account(id, &changes).await;
            if should_invalidate(&result, Option::is_some) {
                aside.invalidate(&account_keys(id)).await;
                tracing::debug!(account_id = id, "Account updated");
            }
            result
        })
        .await
    }

    async fn delete_account(&self, id: i64) -> Result<bool> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();

        run_to_completion(async move {
            let result = repository.delete_account(id).await;
            if should_invalidate(&result, |deleted| *deleted) {
                aside.invalidate(&account_keys(id)).await;
                tracing::debug!(account_id = id, "Account deleted");
            }
            result
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use finbook_core::finance::AccountType;

    use crate::storage::cached::fence::InvalidationFence;
    use crate::storage::cached::mock::MockCache;

    struct MockAccountRepository {
        accounts: RwLock<HashMap<i64, Account>>,
        next_id: AtomicI64,
        get_calls: AtomicUsize,
        list_calls: AtomicUsize,
    }

    impl MockAccountRepository {
        fn new() -> Self {
            Self {
                accounts: RwLock::new(HashMap::new()),
                next_id: AtomicI64::new(1),
                get_calls: AtomicUsize::new(0),
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AccountRepository for MockAccountRepository {
        async fn get_account(&self, id: i64) -> Result<Option<Account>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .accounts
                .read()
                .await
                .get(&id)
                .filter(|a| !a.is_deleted())
                .cloned())
        }

        async fn list_accounts(&self) -> Result<Vec<Account>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .accounts
                .read()
                .await
                .values()
                .filter(|a| !a.is_deleted())
                .cloned()
                .collect())
        }

        async fn create_account(&self, account: &NewAccount) -> Result<Account> {
            let now = Utc::now();
            let created = Account {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                user_id: account.user_id,
                name: account.name.clone(),
                account_type: account.account_type,
                currency_code: account.currency_code.clone(),
                opening_balance_cents: account.opening_balance_cents,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            self.accounts
                .write()
                .await
                .insert(created.id, created.clone());
            Ok(created)
        }

        async fn update_account(
            &self,
            id: i64,
            changes: &AccountChanges,
        ) -> Result<Option<Account>> {
            let mut accounts = self.accounts.write().await;
            let Some(account) = accounts.get_mut(&id).filter(|a| !a.is_deleted()) else {
                return Ok(None);
            };
            if let Some(name) = &changes.name {
                account.name = name.clone();
            }
            if let Some(balance) = changes.opening_balance_cents {
                account.opening_balance_cents = balance;
            }
            Ok(Some(account.clone()))
        }

        async fn delete_account(&self, id: i64) -> Result<bool> {
            let mut accounts = self.accounts.write().await;
            match accounts.get_mut(&id).filter(|a| !a.is_deleted()) {
                Some(account) => {
                    account.deleted_at = Some(Utc::now());
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    fn setup() -> (
        Arc<MockAccountRepository>,
        Arc<MockCache>,
        CachedAccountRepository<MockAccountRepository, MockCache>,
    ) {
        let repo = Arc::new(MockAccountRepository::new());
        let cache = Arc::new(MockCache::new());
        let fence = Arc::new(InvalidationFence::new(NonZeroUsize::new(64).unwrap()));
        let aside = CacheAside::new(cache.clone(), fence, Duration::from_secs(300));
        (repo.clone(), cache, CachedAccountRepository::new(repo, aside))
    }

    fn new_account() -> NewAccount {
        NewAccount {
            user_id: 1,
            name: "Main".to_string(),
            account_type: AccountType::Current,
            currency_code: "BRL".to_string(),
            opening_balance_cents: 0,
        }
    }

    #[tokio::test]
    async fn test_get_account_cache_hit() {
        let (repo, _cache, cached) = setup();
        let account = cached.create_account(&new_account()).await.unwrap();

        cached.get_account(account.id).await.unwrap();
        let hit = cached.get_account(account.id).await.unwrap();

        assert_eq!(hit.map(|a| a.id), Some(account.id));
        assert_eq!(repo.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_create_account_refreshes_collection() {
        let (repo, cache, cached) = setup();
        assert!(cached.list_accounts().await.unwrap().is_empty());
        assert!(cache.contains("accounts:all"));

        cached.create_account(&new_account()).await.unwrap();

        assert!(!cache.contains("accounts:all"));
        assert_eq!(cached.list_accounts().await.unwrap().len(), 1);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_update_account_invalidates_record_and_collection() {
        let (_repo, cache, cached) = setup();
        let account = cached.create_account(&new_account()).await.unwrap();
        cached.get_account(account.id).await.unwrap();
        cached.list_accounts().await.unwrap();

        let changes = AccountChanges {
            opening_balance_cents: Some(5_000),
            ..Default::default()
        };
        cached.update_account(account.id, &changes).await.unwrap();

        assert!(!cache.contains(&account_key(account.id)));
        assert!(!cache.contains("accounts:all"));
        let fresh = cached.get_account(account.id).await.unwrap().unwrap();
        assert_eq!(fresh.opening_balance_cents, 5_000);
    }

    #[tokio::test]
    async fn test_delete_account_hides_it_from_reads() {
        let (_repo, _cache, cached) = setup();
        let account = cached.create_account(&new_account()).await.unwrap();
        cached.get_account(account.id).await.unwrap();
        cached.list_accounts().await.unwrap();

        assert!(cached.delete_account(account.id).await.unwrap());

        assert!(cached.get_account(account.id).await.unwrap().is_none());
        assert!(cached.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_account_touches_no_key() {
        let (_repo, cache, cached) = setup();

        assert!(!cached.delete_account(99).await.unwrap());
        assert!(cache.deleted_keys().is_empty());
    }
}
