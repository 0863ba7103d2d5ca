//! Cached category repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use finbook_core::cache::{category_key, user_categories_key, Cache};
use finbook_core::finance::{Category, CategoryChanges, NewCategory};
use finbook_core::storage::{CategoryRepository, Result};

use super::aside::{run_to_completion, CacheAside};

/// Cached category repository decorator.
///
/// Serves `categories:<id>` and `categories:user:<user_id>` cache-aside.
/// When a write fails ambiguously the owning user is unknown, so only the
/// per-record key is invalidated and the user's list ages out by TTL.
pub struct CachedCategoryRepository<R, C>
where
    R: CategoryRepository,
    C: Cache,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
}

impl<R, C> CachedCategoryRepository<R, C>
where
    R: CategoryRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, aside: CacheAside<C>) -> Self {
        Self { repository, aside }
    }
}

fn category_keys(category: &Category) -> Vec<String> {
    vec![
        category_key(category.id),
        user_categories_key(category.user_id),
    ]
}

#[async_trait]
impl<R, C> CategoryRepository for CachedCategoryRepository<R, C>
where
    R: CategoryRepository + 'static,
    C: Cache + 'static,
{
    async fn get_category(&self, id: i64) -> Result<Option<Category>> {
        self.aside
            .get_or_load(&category_key(id), self.repository.get_category(id))
            .await
    }

    async fn list_categories_by_user(&self, user_id: i64) -> Result<Vec<Category>> {
        self.aside
            .get_or_load_list(
                &user_categories_key(user_id),
                self.repository.list_categories_by_user(user_id),
            )
            .await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<Category> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let category = category.clone();

        run_to_completion(async move {
            let result = repository.create_category(&category).await;
            match &result {
                Ok(created) => {
                    aside.invalidate(&category_keys(created)).await;
                    tracing::debug!(
                        category_id = created.id,
                        user_id = created.user_id,
                        "Category created"
                    );
                }
                Err(err) if err.may_have_written() => {
                    aside
                        .invalidate(&[user_categories_key(category.user_id)])
                        .await;
                }
                Err(_) => {}
            }
            result
        })
        .await
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let changes = changes.clone();

        run_to_completion(async move {
            let result = repository.update_category(id, &changes).await;
            match &result {
                Ok(Some(updated)) => {
                    aside.invalidate(&category_keys(updated)).await;
                    tracing::debug!(category_id = id, "Category updated");
                }
                Ok(None) => {}
                Err(err) if err.may_have_written() => {
                    aside.invalidate(&[category_key(id)]).await;
                }
                Err(_) => {}
            }
            result
        })
        .await
    }

    async fn delete_category(&self, id: i64) -> Result<Option<Category>> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();

        run_to_completion(async move {
            let result = repository.delete_category(id).await;
            match &result {
                Ok(Some(deleted)) => {
                    aside.invalidate(&category_keys(deleted)).await;
                    tracing::debug!(category_id = id, "Category deleted");
                }
                Ok(None) => {}
                Err(err) if err.may_have_written() => {
                    aside.invalidate(&[category_key(id)]).await;
                }
                Err(_) => {}
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

    use finbook_core::finance::CategoryKind;
    use finbook_core::storage::RepositoryError;

    use crate::storage::cached::fence::InvalidationFence;
    use crate::storage::cached::mock::MockCache;

    struct MockCategoryRepository {
        categories: RwLock<HashMap<i64, Category>>,
        next_id: AtomicI64,
        list_calls: AtomicUsize,
    }

    impl MockCategoryRepository {
        fn new() -> Self {
            Self {
                categories: RwLock::new(HashMap::new()),
                next_id: AtomicI64::new(1),
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepository {
        async fn get_category(&self, id: i64) -> Result<Option<Category>> {
            Ok(self
                .categories
                .read()
                .await
                .get(&id)
                .filter(|c| !c.is_deleted())
                .cloned())
        }

        async fn list_categories_by_user(&self, user_id: i64) -> Result<Vec<Category>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .categories
                .read()
                .await
                .values()
                .filter(|c| c.user_id == user_id && !c.is_deleted())
                .cloned()
                .collect())
        }

        async fn create_category(&self, category: &NewCategory) -> Result<Category> {
            let mut categories = self.categories.write().await;
            if categories
                .values()
                .any(|c| c.user_id == category.user_id && c.name == category.name)
            {
                return Err(RepositoryError::Duplicate {
                    entity_type: "Category",
                    field: "name",
                    value: category.name.clone(),
                });
            }
            let now = Utc::now();
            let created = Category {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                user_id: category.user_id,
                parent_id: category.parent_id,
                name: category.name.clone(),
                kind: category.kind,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            };
            categories.insert(created.id, created.clone());
            Ok(created)
        }

        async fn update_category(
            &self,
            id: i64,
            changes: &CategoryChanges,
        ) -> Result<Option<Category>> {
            let mut categories = self.categories.write().await;
            let Some(category) = categories.get_mut(&id).filter(|c| !c.is_deleted()) else {
                return Ok(None);
            };
            if let Some(name) = &changes.name {
                category.name = name.clone();
            }
            if let Some(kind) = changes.kind {
                category.kind = kind;
            }
            Ok(Some(category.clone()))
        }

        async fn delete_category(&self, id: i64) -> Result<Option<Category>> {
            let mut categories = self.categories.write().await;
            let Some(category) = categories.get_mut(&id).filter(|c| !c.is_deleted()) else {
                return Ok(None);
            };
            category.deleted_at = Some(Utc::now());
            Ok(Some(category.clone()))
        }
    }

    fn setup() -> (
        Arc<MockCategoryRepository>,
        Arc<MockCache>,
        CachedCategoryRepository<MockCategoryRepository, MockCache>,
    ) {
        let repo = Arc::new(MockCategoryRepository::new());
        let cache = Arc::new(MockCache::new());
        let fence = Arc::new(InvalidationFence::new(NonZeroUsize::new(64).unwrap()));
        let aside = CacheAside::new(cache.clone(), fence, Duration::from_secs(300));
        (repo.clone(), cache, CachedCategoryRepository::new(repo, aside))
    }

    fn new_category(user_id: i64, name: &str) -> NewCategory {
        NewCategory {
            user_id,
            parent_id: None,
            name: name.to_string(),
            kind: CategoryKind::Expense,
        }
    }

    #[tokio::test]
    async fn test_list_by_user_is_cached_per_user() {
        let (repo, cache, cached) = setup();
        cached.create_category(&new_category(1, "Food")).await.unwrap();
        cached.create_category(&new_category(2, "Rent")).await.unwrap();

        assert_eq!(cached.list_categories_by_user(1).await.unwrap().len(), 1);
        assert_eq!(cached.list_categories_by_user(1).await.unwrap().len(), 1);
        assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains("categories:user:1"));
        assert!(!cache.contains("categories:user:2"));
    }

    #[tokio::test]
    async fn test_create_category_invalidates_owner_list_only() {
        let (_repo, cache, cached) = setup();
        cached.list_categories_by_user(1).await.unwrap();
        cached.list_categories_by_user(2).await.unwrap();

        cached.create_category(&new_category(1, "Food")).await.unwrap();

        assert!(!cache.contains("categories:user:1"));
        assert!(cache.contains("categories:user:2"));
    }

    #[tokio::test]
    async fn test_duplicate_category_touches_no_key() {
        let (_repo, cache, cached) = setup();
        cached.create_category(&new_category(1, "Food")).await.unwrap();
        let before = cache.deleted_keys().len();

        let result = cached.create_category(&new_category(1, "Food")).await;

        assert!(matches!(result, Err(RepositoryError::Duplicate { .. })));
        assert_eq!(cache.deleted_keys().len(), before);
    }

    #[tokio::test]
    async fn test_update_category_invalidates_record_and_owner_list() {
        let (_repo, cache, cached) = setup();
        let category = cached.create_category(&new_category(1, "Food")).await.unwrap();
        cached.get_category(category.id).await.unwrap();
        cached.list_categories_by_user(1).await.unwrap();

        let changes = CategoryChanges {
            kind: Some(CategoryKind::Income),
            ..Default::default()
        };
        cached.update_category(category.id, &changes).await.unwrap();

        assert!(!cache.contains(&category_key(category.id)));
        assert!(!cache.contains("categories:user:1"));
        let fresh = cached.get_category(category.id).await.unwrap().unwrap();
        assert_eq!(fresh.kind, CategoryKind::Income);
    }

    #[tokio::test]
    async fn test_delete_category_removes_it_from_owner_list() {
        let (_repo, _cache, cached) = setup();
        let category = cached.create_category(&new_category(1, "Food")).await.unwrap();
        cached.list_categories_by_user(1).await.unwrap();

        let deleted = cached.delete_category(category.id).await.unwrap();

        assert!(deleted.is_some());
        assert!(cached.list_categories_by_user(1).await.unwrap().is_empty());
        assert!(cached.get_category(category.id).await.unwrap().is_none());
    }
}
