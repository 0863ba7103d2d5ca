//! Pure functions for serializing/deserializing records to/from cache bytes.
//!
//! Values are stored as JSON so cache contents stay readable with `redis-cli`.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a record (or list of records) to JSON bytes.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes produced by [`serialize`].
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::{Account, AccountType, PasswordHash, User};
    use chrono::{TimeZone, Utc};

    fn fixed_timestamp() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    fn test_user() -> User {
        User {
            id: 42,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: PasswordHash::new("$argon2id$hash"),
            created_at: fixed_timestamp(),
            updated_at: fixed_timestamp(),
        }
    }

    #[test]
    fn test_cached_user_keeps_password_hash() {
        let user = test_user();
        let bytes = serialize(&user).expect("serialize should succeed");
        let restored: User = deserialize(&bytes).expect("deserialize should succeed");

        assert_eq!(restored, user);
        assert_eq!(restored.password_hash.as_str(), "$argon2id$hash");
    }

    #[test]
    fn test_serialize_account_list() {
        let account = Account {
            id: 1,
            user_id: 42,
            name: "Main".to_string(),
            account_type: AccountType::Current,
            currency_code: "BRL".to_string(),
            opening_balance_cents: 0,
            created_at: fixed_timestamp(),
            updated_at: fixed_timestamp(),
            deleted_at: None,
        };
        let bytes = serialize(&[account.clone()][..]).expect("serialize should succeed");
        let restored: Vec<Account> = deserialize(&bytes).expect("deserialize should succeed");

        assert_eq!(restored, vec![account]);
    }

    #[test]
    fn test_serialize_empty_list() {
        let users: Vec<User> = vec![];
        let bytes = serialize(&users).expect("serialize should succeed");
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_deserialize_malformed_bytes() {
        let result: Result<User> = deserialize(b"not valid json");
        assert!(matches!(result, Err(SerializationError::DeserializeFailed(_))));
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let result: Result<Vec<User>> = deserialize(b"{\"invalid\": true}");
        assert!(matches!(result, Err(SerializationError::DeserializeFailed(_))));
    }
}
