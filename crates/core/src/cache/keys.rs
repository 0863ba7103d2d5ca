//! Cache key layout.
//!
//! Each entity has a per-record key and one collection key. Collections are
//! cached wholesale, so any write to a member invalidates the collection key.

/// Returns the cache key for a single user.
pub fn user_key(user_id: i64) -> String {
    format!("users:{}", user_id)
}

/// Returns the cache key for the list of all users.
pub fn users_collection_key() -> String {
    "users:all".to_string()
}

/// Returns the cache key for a single account.
pub fn account_key(account_id: i64) -> String {
    format!("accounts:{}", account_id)
}

/// Returns the cache key for the list of all active accounts.
pub fn accounts_collection_key() -> String {
    "accounts:all".to_string()
}

/// Returns the cache key for a single category.
pub fn category_key(category_id: i64) -> String {
    format!("categories:{}", category_id)
}

/// Returns the cache key for the active categories of one user.
pub fn user_categories_key(user_id: i64) -> String {
    format!("categories:user:{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keys() {
        assert_eq!(user_key(42), "users:42");
        assert_eq!(users_collection_key(), "users:all");
    }

    #[test]
    fn test_account_keys() {
        assert_eq!(account_key(7), "accounts:7");
        assert_eq!(accounts_collection_key(), "accounts:all");
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(category_key(3), "categories:3");
        assert_eq!(user_categories_key(42), "categories:user:42");
    }

    #[test]
    fn test_per_record_keys_never_collide_with_collections() {
        assert_ne!(user_categories_key(1), category_key(1));
        assert_ne!(users_collection_key(), user_key(0));
    }
}
