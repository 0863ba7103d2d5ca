//! Cached user repository decorator.

use std::sync::Arc;

use async_trait::async_trait;

use finbook_core::cache::{
    account_key, accounts_collection_key, category_key, user_categories_key, user_key,
    users_collection_key, Cache,
};
use finbook_core::finance::{NewUser, User, UserChanges};
use finbook_core::storage::{DeletedUser, Result, UserRepository};

use super::aside::{run_to_completion, should_invalidate, CacheAside};

/// Cached user repository decorator.
///
/// - **Reads**: `users:<id>` and `users:all` are served cache-aside.
///   Lookups by email always go to the store.
/// - **Writes**: persist, then invalidate the user's keys. A delete also
///   invalidates every account and category that went with the user.
pub struct CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    repository: Arc<R>,
    aside: CacheAside<C>,
}

impl<R, C> CachedUserRepository<R, C>
where
    R: UserRepository,
    C: Cache,
{
    pub fn new(repository: Arc<R>, aside: CacheAside<C>) -> Self {
        Self { repository, aside }
    }
}

fn user_keys(id: i64) -> Vec<String> {
    vec![user_key(id), users_collection_key()]
}

/// Keys touched by a user delete whose cascade is unknown.
fn user_delete_keys(id: i64) -> Vec<String> {
    let mut keys = user_keys(id);
    keys.push(accounts_collection_key());
    keys.push(user_categories_key(id));
    keys
}

fn cascade_keys(deleted: &DeletedUser) -> Vec<String> {
    let mut keys = user_delete_keys(deleted.user.id);
    keys.extend(deleted.account_ids.iter().copied().map(account_key));
    keys.extend(deleted.category_ids.iter().copied().map(category_key));
    keys
}

#[async_trait]
impl<R, C> UserRepository for CachedUserRepository<R, C>
where
    R: UserRepository + 'static,
    C: Cache + 'static,
{
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.aside
            .get_or_load(&user_key(id), self.repository.get_user(id))
            .await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.repository.get_user_by_email(email).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.aside
            .get_or_load_list(&users_collection_key(), self.repository.list_users())
            .await
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let user = user.clone();

        run_to_completion(async move {
            let result = repository.create_user(&user).await;
            match &result {
                Ok(created) => {
                    aside.invalidate(&user_keys(created.id)).await;
                    tracing::debug!(user_id = created.id, "User created");
                }
                Err(err) if err.may_have_written() => {
                    aside.invalidate(&[users_collection_key()]).await;
                }
                Err(_) => {}
            }
            result
        })
        .await
    }

    async fn update_user(&self, id: i64, changes: &UserChanges) -> Result<Option<User>> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();
        let changes = changes.clone();

        run_to_completion(async move {
            let result = repository.update_user(id, &changes).await;
            if should_invalidate(&result, Option::is_some) {
                aside.invalidate(&user_keys(id)).await;
                tracing::debug!(user_id = id, "User updated");
            }
            result
        })
        .await
    }

    async fn delete_user(&self, id: i64) -> Result<Option<DeletedUser>> {
        let repository = self.repository.clone();
        let aside = self.aside.clone();

        run_to_completion(async move {
            let result = repository.delete_user(id).await;
            match &result {
                Ok(Some(deleted)) => {
                    aside.invalidate(&cascade_keys(deleted)).await;
                    tracing::debug!(
                        user_id = id,
                        accounts = deleted.account_ids.len(),
                        categories = deleted.category_ids.len(),
                        "User deleted"
                    );
                }
                Ok(None) => {}
                Err(err) if err.may_have_written() => {
                    aside.invalidate(&user_delete_keys(id)).await;
                }
                Err(_) => {}
            }
            result
        })
        .await
    }
}
