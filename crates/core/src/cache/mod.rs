mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    account_key, accounts_collection_key, category_key, user_categories_key, user_key,
    users_collection_key,
};
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
