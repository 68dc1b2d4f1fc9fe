//! Record builders shared by unit tests.

use chrono::{NaiveDate, Utc};
use clarity_shared::types::{
    AccountId, BudgetId, CategoryId, RecurringPaymentId, TransactionId, UserId,
};
use rust_decimal::Decimal;

use crate::models::{
    Account, AccountType, Budget, Category, RecurringPayment, Transaction, TransactionType,
};
use crate::period::{Frequency, PeriodType};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Parses `YYYY-MM-DD`.
pub fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Transaction whose type follows the sign of `amount`.
pub fn transaction(amount: Decimal, on: &str, category_id: Option<CategoryId>) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        account_id: None,
        category_id,
        amount,
        description: format!("txn {amount}"),
        transaction_date: day(on),
        transaction_type: TransactionType::of_amount(amount),
        tags: None,
        receipt_url: None,
        is_recurring: false,
        recurring_id: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn category(name: &str, budget_limit: Option<Decimal>) -> Category {
    Category {
        id: CategoryId::new(),
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        name: name.to_string(),
        icon: "🍽️".to_string(),
        color: "#EF4444".to_string(),
        budget_limit,
        is_default: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn budget(category_id: CategoryId, allocated: Decimal, start: &str, end: &str) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        category_id,
        allocated_amount: allocated,
        period_type: PeriodType::Monthly,
        period_start: day(start),
        period_end: day(end),
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn recurring(name: &str, amount: Decimal, is_active: bool) -> RecurringPayment {
    RecurringPayment {
        id: RecurringPaymentId::new(),
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        category_id: Some(CategoryId::new()),
        account_id: None,
        name: name.to_string(),
        amount,
        frequency: Frequency::Monthly,
        next_payment_date: date(2025, 2, 1),
        anchor_day: None,
        last_payment_date: None,
        is_active,
        icon: "💳".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn account(name: &str, balance: Decimal, currency: &str) -> Account {
    Account {
        id: AccountId::new(),
        user_id: UserId::from_uuid(uuid::Uuid::nil()),
        name: name.to_string(),
        account_type: AccountType::Checking,
        balance,
        currency: currency.to_string(),
        is_connected: false,
        last_sync: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
