//! Transactions.
//!
//! Amounts are stored signed: expenses negative, income positive. Inputs take
//! the amount as entered and the type decides the stored sign.

use chrono::{DateTime, NaiveDate, Utc};
use clarity_shared::types::{AccountId, CategoryId, RecurringPaymentId, TransactionId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, require_nonzero, require_text};

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money in.
    Income,
    /// Money out.
    Expense,
}

impl TransactionType {
    /// Signs `amount` for storage: expenses negative, income positive.
    #[must_use]
    pub fn apply_sign(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }

    /// Direction implied by a stored signed amount.
    #[must_use]
    pub fn of_amount(amount: Decimal) -> Self {
        if amount.is_sign_negative() && !amount.is_zero() {
            Self::Expense
        } else {
            Self::Income
        }
    }
}

/// A transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Owning identity.
    pub user_id: UserId,
    /// Account the money moved through; cleared when the account is deleted.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Category; cleared when the category is deleted.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Signed amount.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Booking date.
    pub transaction_date: NaiveDate,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Optional tags.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Receipt location.
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// Whether this was generated from a recurring payment.
    #[serde(default)]
    pub is_recurring: bool,
    /// Source recurring payment.
    #[serde(default)]
    pub recurring_id: Option<RecurringPaymentId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns true for expense transactions.
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Returns true for income transactions.
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }
}

/// Input for creating a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    /// Account the money moved through.
    pub account_id: Option<AccountId>,
    /// Category.
    pub category_id: CategoryId,
    /// Amount as entered; its sign is replaced by the type's.
    pub amount: Decimal,
    /// Free-text description.
    pub description: String,
    /// Booking date.
    pub transaction_date: NaiveDate,
    /// Direction.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Optional tags.
    pub tags: Option<Vec<String>>,
    /// Receipt location.
    pub receipt_url: Option<String>,
    /// Whether this was generated from a recurring payment.
    pub is_recurring: bool,
    /// Source recurring payment.
    pub recurring_id: Option<RecurringPaymentId>,
}

impl NewTransaction {
    /// Creates a one-off transaction input with no account, tags, or receipt.
    #[must_use]
    pub fn new(
        category_id: CategoryId,
        transaction_type: TransactionType,
        amount: Decimal,
        description: impl Into<String>,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            account_id: None,
            category_id,
            amount,
            description: description.into(),
            transaction_date,
            transaction_type,
            tags: None,
            receipt_url: None,
            is_recurring: false,
            recurring_id: None,
        }
    }

    /// Validates the input and signs the amount by type.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or the description is empty.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        require_nonzero(self.amount)?;
        require_text("description", &self.description)?;
        self.amount = self.transaction_type.apply_sign(self.amount);
        Ok(self)
    }
}

/// Sparse update for a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionPatch {
    /// New account; `Some(None)` detaches it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub account_id: Option<Option<AccountId>>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// New amount as entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New booking date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,
    /// New direction.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// New tags; `Some(None)` clears them.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub tags: Option<Option<Vec<String>>>,
}

impl TransactionPatch {
    /// Returns true if normalizing this patch needs the stored record.
    #[must_use]
    pub fn needs_current(&self) -> bool {
        self.amount.is_some() != self.transaction_type.is_some()
    }

    /// Validates the patch and keeps the stored amount's sign in agreement
    /// with the type.
    ///
    /// Changing only the type re-signs the stored amount; changing only the
    /// amount signs it by the stored type.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the description is empty, or
    /// the direction cannot be resolved without `current`.
    pub fn normalized(mut self, current: Option<&Transaction>) -> Result<Self, ValidationError> {
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        let direction = self
            .transaction_type
            .or_else(|| current.map(|t| t.transaction_type));
        let amount = self.amount.or_else(|| {
            self.transaction_type
                .and_then(|_| current.map(|t| t.amount))
        });
        match (amount, direction) {
            (Some(amount), Some(direction)) => {
                require_nonzero(amount)?;
                self.amount = Some(direction.apply_sign(amount));
                self.transaction_type = Some(direction);
            }
            (Some(_), None) => return Err(ValidationError::Required("type")),
            (None, _) => {}
        }
        Ok(self)
    }
}
