//! Recurring payments (subscriptions, rent, salary).
//!
//! Amounts are signed exactly like transactions.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use clarity_shared::types::{AccountId, CategoryId, RecurringPaymentId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::{NewTransaction, TransactionType};
use crate::period::Frequency;
use crate::validation::{ValidationError, require_nonzero, require_text};

/// Icon used when none is chosen.
pub const DEFAULT_ICON: &str = "💳";

/// A recurring payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringPayment {
    /// Payment ID.
    pub id: RecurringPaymentId,
    /// Owning identity.
    pub user_id: UserId,
    /// Category; cleared when the category is deleted.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Account charged; cleared when the account is deleted.
    #[serde(default)]
    pub account_id: Option<AccountId>,
    /// Display name.
    pub name: String,
    /// Signed amount per occurrence.
    pub amount: Decimal,
    /// Repeat interval.
    #[serde(default)]
    pub frequency: Frequency,
    /// Date of the next occurrence.
    pub next_payment_date: NaiveDate,
    /// Day of the month monthly and yearly occurrences fall on before clamping.
    #[serde(default)]
    pub anchor_day: Option<u32>,
    /// Date of the last recorded occurrence.
    #[serde(default)]
    pub last_payment_date: Option<NaiveDate>,
    /// Whether the payment is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Emoji glyph.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

const fn default_active() -> bool {
    true
}

impl RecurringPayment {
    /// Direction implied by the stored amount.
    #[must_use]
    pub fn direction(&self) -> TransactionType {
        TransactionType::of_amount(self.amount)
    }

    /// Returns true if the payment is active and its next date is on or before `today`.
    #[must_use]
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_payment_date <= today
    }

    /// Anchor day, falling back to the day of the next occurrence.
    #[must_use]
    pub fn anchor(&self) -> u32 {
        self.anchor_day.unwrap_or_else(|| self.next_payment_date.day())
    }

    /// Patch that records the pending occurrence and schedules the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the next date falls off the calendar.
    pub fn advance(&self) -> Result<RecurringPaymentPatch, ValidationError> {
        let anchor = self.anchor();
        let next = self
            .frequency
            .next_after(self.next_payment_date, anchor)
            .ok_or(ValidationError::DateOutOfRange)?;
        Ok(RecurringPaymentPatch {
            next_payment_date: Some(next),
            anchor_day: Some(anchor),
            last_payment_date: Some(Some(self.next_payment_date)),
            ..RecurringPaymentPatch::default()
        })
    }

    /// Transaction input for the pending occurrence.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment's category has been deleted.
    pub fn occurrence(&self) -> Result<NewTransaction, ValidationError> {
        let category_id = self
            .category_id
            .ok_or(ValidationError::Required("category_id"))?;
        let mut input = NewTransaction::new(
            category_id,
            self.direction(),
            self.amount,
            self.name.clone(),
            self.next_payment_date,
        );
        input.account_id = self.account_id;
        input.is_recurring = true;
        input.recurring_id = Some(self.id);
        Ok(input)
    }
}

/// Input for creating a recurring payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecurringPayment {
    /// Category.
    pub category_id: CategoryId,
    /// Account charged.
    pub account_id: Option<AccountId>,
    /// Display name.
    pub name: String,
    /// Amount as entered; signed by `direction`.
    pub amount: Decimal,
    /// Direction used to sign the amount. Not stored.
    #[serde(skip)]
    pub direction: TransactionType,
    /// Repeat interval.
    pub frequency: Frequency,
    /// First occurrence.
    pub next_payment_date: NaiveDate,
    /// Day later occurrences fall on; taken from `next_payment_date`.
    pub anchor_day: u32,
    /// Whether the payment is active.
    pub is_active: bool,
    /// Emoji glyph.
    pub icon: String,
}

impl NewRecurringPayment {
    /// Creates an active payment input with the default icon and no account.
    #[must_use]
    pub fn new(
        category_id: CategoryId,
        name: impl Into<String>,
        direction: TransactionType,
        amount: Decimal,
        frequency: Frequency,
        next_payment_date: NaiveDate,
    ) -> Self {
        Self {
            category_id,
            account_id: None,
            name: name.into(),
            amount,
            direction,
            frequency,
            next_payment_date,
            anchor_day: next_payment_date.day(),
            is_active: true,
            icon: default_icon(),
        }
    }

    /// Validates the input and signs the amount by direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero or the name is empty.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        require_nonzero(self.amount)?;
        require_text("name", &self.name)?;
        self.amount = self.direction.apply_sign(self.amount);
        self.anchor_day = self.next_payment_date.day();
        Ok(self)
    }
}

/// Sparse update for a recurring payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecurringPaymentPatch {
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// New account; `Some(None)` detaches it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub account_id: Option<Option<AccountId>>,
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New amount as entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    /// New direction. Not stored; re-signs the amount.
    #[serde(skip)]
    pub direction: Option<TransactionType>,
    /// New interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// New next occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
    /// New anchor day; set from `next_payment_date` when only the date is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_day: Option<u32>,
    /// New last occurrence; `Some(None)` clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub last_payment_date: Option<Option<NaiveDate>>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// New icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl RecurringPaymentPatch {
    /// Returns true if normalizing this patch needs the stored record.
    #[must_use]
    pub fn needs_current(&self) -> bool {
        self.amount.is_some() != self.direction.is_some()
    }

    /// Validates the patch and signs any amount change.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the name is empty, or the
    /// direction cannot be resolved without `current`.
    pub fn normalized(
        mut self,
        current: Option<&RecurringPayment>,
    ) -> Result<Self, ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if self.anchor_day.is_none() {
            self.anchor_day = self.next_payment_date.map(|d| d.day());
        }
        let direction = self
            .direction
            .or_else(|| current.map(RecurringPayment::direction));
        let amount = self
            .amount
            .or_else(|| self.direction.and_then(|_| current.map(|p| p.amount)));
        match (amount, direction) {
            (Some(amount), Some(direction)) => {
                require_nonzero(amount)?;
                self.amount = Some(direction.apply_sign(amount));
            }
            (Some(_), None) => return Err(ValidationError::Required("direction")),
            (None, _) => {}
        }
        Ok(self)
    }
}
