use std::sync::Arc;

use finbook_auth::hash_password;
use finbook_core::finance::{
    sanitize_user, sanitize_users, validate_create_user, validate_update_user, CreateUserRequest,
    NewUser, UpdateUserRequest, UserChanges, UserResponse,
};
use finbook_core::storage::UserRepository;

use super::{Result, ServiceError};

/// User operations. Every record leaves through the sanitizer.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn list(&self) -> Result<Vec<UserResponse>> {
        let users = self.users.list_users().await?;
        Ok(sanitize_users(&users))
    }

    pub async fn get(&self, id: i64) -> Result<UserResponse> {
        self.users
            .get_user(id)
            .await?
            .map(|user| sanitize_user(&user))
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    /// Registers a user. The password is hashed before it reaches the store.
    pub async fn create(&self, request: CreateUserRequest) -> Result<UserResponse> {
        validate_create_user(&request)?;

        let new_user = NewUser {
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash: hash_password(request.password).await?,
        };

        let user = self.users.create_user(&new_user).await?;
        tracing::info!(user_id = user.id, "user created");

        Ok(sanitize_user(&user))
    }

    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<UserResponse> {
        validate_update_user(&request)?;

        let password_hash = match request.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };
        let changes = UserChanges {
            name: request.name.map(|n| n.trim().to_string()),
            email: request.email.map(|e| e.trim().to_string()),
            password_hash,
        };

        let user = self
            .users
            .update_user(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;
        tracing::info!(user_id = id, "user updated");

        Ok(sanitize_user(&user))
    }

    /// Hard-deletes a user and everything it owns.
    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = self
            .users
            .delete_user(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        tracing::info!(
            user_id = id,
            accounts = deleted.account_ids.len(),
            categories = deleted.category_ids.len(),
            "user deleted"
        );
        Ok(())
    }
}
