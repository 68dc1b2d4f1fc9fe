//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every mutator in the data layer returns one of these instead of panicking;
/// callers decide how to display the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// No identity is signed in.
    #[error("Not signed in: {0}")]
    Unauthenticated(String),

    /// Input rejected before reaching the record store.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found (or not owned by the current identity).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Record store call failed.
    #[error("Record store error: {0}")]
    Store(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if resubmitting the same request unchanged can never succeed.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated(_) | Self::Validation(_) | Self::NotFound(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
