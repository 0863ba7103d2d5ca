//! JSON envelope shared by every HTTP response.

use serde::{Deserialize, Serialize};

/// `{ data?, message, success, error? }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub message: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            message: message.into(),
            success: true,
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// A successful response without a payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            success: true,
            error: None,
        }
    }

    /// A failed response. `error` carries a short machine-readable reason.
    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            data: None,
            message: message.into(),
            success: false,
            error,
        }
    }
}
