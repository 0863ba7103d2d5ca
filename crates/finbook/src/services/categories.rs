use std::sync::Arc;

use finbook_core::finance::{
    sanitize_categories, sanitize_category, validate_create_category, validate_update_category,
    CategoryResponse, CreateCategoryRequest, NewCategory, UpdateCategoryRequest,
};
use finbook_core::storage::{CategoryRepository, UserRepository};

use super::{Result, ServiceError};

/// Category operations.
#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    users: Arc<dyn UserRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { categories, users }
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<CategoryResponse>> {
        let categories = self.categories.list_categories_by_user(user_id).await?;
        Ok(sanitize_categories(&categories))
    }

    pub async fn get(&self, id: i64) -> Result<CategoryResponse> {
        self.categories
            .get_category(id)
            .await?
            .map(|category| sanitize_category(&category))
            .ok_or_else(|| ServiceError::not_found("Category", id))
    }

    /// Creates a category owned by `user_id`.
    ///
    /// A parent must be an active category of the same user.
    pub async fn create(
        &self,
        user_id: i64,
        request: CreateCategoryRequest,
    ) -> Result<CategoryResponse> {
        validate_create_category(&request)?;

        if self.users.get_user(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }

        if let Some(parent_id) = request.parent_id {
            let parent = self.categories.get_category(parent_id).await?;
            if parent.is_none_or(|p| p.user_id != user_id) {
                return Err(ServiceError::not_found("Parent category", parent_id));
            }
        }

        let new_category = NewCategory {
            user_id,
            parent_id: request.parent_id,
            name: request.name.trim().to_string(),
            kind: request.kind,
        };

        let category = self.categories.create_category(&new_category).await?;
        tracing::info!(category_id = category.id, user_id, "category created");

        Ok(sanitize_category(&category))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateCategoryRequest,
    ) -> Result<CategoryResponse> {
        validate_update_category(&request)?;

        let mut changes = request.into_changes();
        changes.name = changes.name.map(|n| n.trim().to_string());

        let category = self
            .categories
            .update_category(id, &changes)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;
        tracing::info!(category_id = id, "category updated");

        Ok(sanitize_category(&category))
    }

    /// Soft-deletes a category.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.categories
            .delete_category(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Category", id))?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}
