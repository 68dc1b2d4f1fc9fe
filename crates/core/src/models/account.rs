//! Accounts.

use chrono::{DateTime, Utc};
use clarity_shared::types::{AccountId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DEFAULT_CURRENCY;
use crate::validation::{ValidationError, require_text};

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Everyday checking account.
    #[default]
    Checking,
    /// Savings account.
    Savings,
    /// Credit card or credit line.
    Credit,
    /// Brokerage or investment account.
    Investment,
}

/// An account. The balance is entered by the user, not derived from transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning identity.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Current balance.
    pub balance: Decimal,
    /// Currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Whether the account is linked to a bank feed.
    #[serde(default)]
    pub is_connected: bool,
    /// Last bank feed sync.
    #[serde(default)]
    pub last_sync: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Input for creating an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Opening balance.
    pub balance: Decimal,
    /// Currency code.
    pub currency: String,
    /// Whether the account is linked to a bank feed.
    pub is_connected: bool,
}

impl NewAccount {
    /// Creates an unconnected account input in the default currency.
    #[must_use]
    pub fn new(name: impl Into<String>, account_type: AccountType, balance: Decimal) -> Self {
        Self {
            name: name.into(),
            account_type,
            balance,
            currency: default_currency(),
            is_connected: false,
        }
    }

    /// Validates the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or currency is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("currency", &self.currency)
    }
}

/// Sparse update for an account. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountPatch {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New type.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    /// New balance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    /// New currency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// New connection flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_connected: Option<bool>,
    /// New sync timestamp; `Some(None)` clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub last_sync: Option<Option<DateTime<Utc>>>,
}

impl AccountPatch {
    /// Validates the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns an error if a present name or currency is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(currency) = &self.currency {
            require_text("currency", currency)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_account_serializes_type_key() {
        let input = NewAccount::new("ING Current", AccountType::Checking, dec!(1500.50));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["type"], "checking");
        assert_eq!(json["currency"], "RON");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_new_account_requires_name() {
        let input = NewAccount::new(" ", AccountType::Savings, dec!(0));
        assert_eq!(input.validate(), Err(ValidationError::Required("name")));
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = AccountPatch {
            balance: Some(dec!(200)),
            last_sync: Some(None),
            ..AccountPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["last_sync"].is_null());
    }

    #[test]
    fn test_account_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": "0190a0b0-0000-7000-8000-000000000001",
            "user_id": "0190a0b0-0000-7000-8000-000000000002",
            "name": "Revolut",
            "type": "credit",
            "balance": -120.5,
            "created_at": "2025-01-05T10:00:00+00:00",
            "updated_at": "2025-01-05T10:00:00+00:00"
        });
        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.account_type, AccountType::Credit);
        assert_eq!(account.balance, dec!(-120.5));
        assert_eq!(account.currency, "RON");
        assert!(!account.is_connected);
        assert!(account.last_sync.is_none());
    }
}
