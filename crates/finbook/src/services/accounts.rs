use std::sync::Arc;

use finbook_core::finance::{
    sanitize_account, sanitize_accounts, validate_create_account, validate_update_account,
    AccountResponse, CreateAccountRequest, UpdateAccountRequest,
};
use finbook_core::storage::{AccountRepository, UserRepository};

use super::{Result, ServiceError};

/// Account operations.
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { accounts, users }
    }

    pub async fn list(&self) -> Result<Vec<AccountResponse>> {
        let accounts = self.accounts.list_accounts().await?;
        Ok(sanitize_accounts(&accounts))
    }

    pub async fn get(&self, id: i64) -> Result<AccountResponse> {
        self.accounts
            .get_account(id)
            .await?
            .map(|account| sanitize_account(&account))
            .ok_or_else(|| ServiceError::not_found("Account", id))
    }

    /// Opens an account for `user_id`, filling in defaults for missing fields.
    pub async fn create(
        &self,
        user_id: i64,
        request: CreateAccountRequest,
    ) -> Result<AccountResponse> {
        validate_create_account(&request)?;

        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }

        let mut new_account = request.into_new_account(user_id);
        new_account.name = new_account.name.trim().to_string();

        let account = self.accounts.create_account(&new_account).await?;
        tracing::info!(account_id = account.id, user_id, "account created");

        Ok(sanitize_account(&account))
    }

    pub async fn update(&self, id: i64, request: UpdateAccountRequest) -> Result<AccountResponse> {
        validate_update_account(&request)?;

        let mut changes = request.into_changes();
        changes.name = changes.name.map(|n| n.trim().to_string());

        let account = self
            .accounts
            .update_account(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Account", id))?;
        tracing::info!(account_id = id, "account updated");

        Ok(sanitize_account(&account))
    }

    /// Soft-deletes an account.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.accounts.delete_account(id).await? {
            return Err(ServiceError::not_found("Account", id));
        }
        tracing::info!(account_id = id, "account deleted");
        Ok(())
    }
}
