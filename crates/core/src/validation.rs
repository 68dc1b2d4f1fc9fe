//! Input validation for create and update requests.
//!
//! Validation runs before any record store call; a rejected input never
//! reaches the store.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation errors for submitted inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Amount is zero.
    #[error("Amount must not be zero")]
    ZeroAmount,

    /// Amount is zero or negative where a positive value is required.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: Decimal,
    },

    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    Required(&'static str),

    /// Period ends before it starts.
    #[error("Period end {end} is before period start {start}")]
    InvalidPeriod {
        /// Period start.
        start: chrono::NaiveDate,
        /// Period end.
        end: chrono::NaiveDate,
    },

    /// Date arithmetic left the supported calendar range.
    #[error("Date is out of range")]
    DateOutOfRange,
}

impl From<ValidationError> for clarity_shared::AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Rejects empty or whitespace-only text.
pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Rejects zero and negative amounts.
pub(crate) fn require_positive(field: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(())
}

/// Rejects zero amounts. Sign is decided elsewhere.
pub(crate) fn require_nonzero(value: Decimal) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::ZeroAmount);
    }
    Ok(())
}
