//! Record store errors.

use clarity_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::Table;

/// Errors returned by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No row matched the id and owner filters.
    #[error("No {table} row {id} for the current identity")]
    NotFound {
        /// Table queried.
        table: Table,
        /// Row id.
        id: Uuid,
    },

    /// The request could not be sent or no response arrived.
    #[error("Request failed: {0}")]
    Request(String),

    /// The store answered with an error status.
    #[error("Store returned {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message reported by the store.
        message: String,
    },

    /// A response or row could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The store is unreachable or refused service.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            _ => Self::Store(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_app_not_found() {
        let err = StoreError::NotFound {
            table: Table::Transactions,
            id: Uuid::nil(),
        };
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "NOT_FOUND");
        assert!(app.to_string().contains("transactions"));
    }

    #[test]
    fn test_server_error_keeps_message() {
        let err = StoreError::Server {
            status: 409,
            message: "duplicate key value".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "STORE_ERROR");
        assert!(app.to_string().contains("duplicate key value"));
    }
}
