//! Report data types.

use chrono::NaiveDate;
use clarity_shared::types::CategoryId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::budget::{BudgetOverview, BudgetSummary};
use crate::models::{RecurringPayment, Transaction};
use crate::period::MonthKey;

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Sum of income amounts.
    pub total_income: Decimal,
    /// Sum of absolute expense amounts.
    pub total_expenses: Decimal,
    /// Income minus expenses.
    pub net: Decimal,
    /// Number of income transactions.
    pub income_count: usize,
    /// Number of expense transactions.
    pub expense_count: usize,
    /// Number of transactions.
    pub total_transactions: usize,
}

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The month.
    pub month: MonthKey,
    /// Totals for the month.
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Spending in one category over a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    /// Category ID.
    pub category_id: CategoryId,
    /// Category name.
    pub name: String,
    /// Category icon.
    pub icon: String,
    /// Category color.
    pub color: String,
    /// Sum of absolute expense amounts.
    pub total_spent: Decimal,
    /// Number of expense transactions.
    pub transaction_count: usize,
    /// Average expense, rounded to 2 dp; 0 with no transactions.
    pub average_amount: Decimal,
    /// The category's spending limit.
    pub budget_limit: Option<Decimal>,
    /// Spent as a percentage of the limit; 0 without a limit.
    pub utilization_percentage: Decimal,
}

/// Totals across category spending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryOverview {
    /// Spent across all categories.
    pub total_spent: Decimal,
    /// Sum of category limits.
    pub total_limit: Decimal,
    /// Spent as a percentage of the total limit; 0 when no limits are set.
    pub utilization_percentage: Decimal,
    /// Expenses in the month without a category.
    pub uncategorized_spent: Decimal,
}

/// Totals across recurring payments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTotals {
    /// Sum of active income payments.
    pub total_income: Decimal,
    /// Sum of absolute active expense payments.
    pub total_expenses: Decimal,
    /// Signed sum of active payments.
    pub net: Decimal,
    /// Number of active payments.
    pub active_count: usize,
    /// Number of paused payments.
    pub inactive_count: usize,
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    /// Day the snapshot was built for.
    pub as_of: NaiveDate,
    /// Month containing `as_of`.
    pub month: MonthKey,
    /// Totals for `month`.
    pub month_totals: PeriodTotals,
    /// Most recent transactions.
    pub recent_transactions: Vec<Transaction>,
    /// Leading active budget summaries.
    pub top_budgets: Vec<BudgetSummary>,
    /// Totals across all active budgets.
    pub budget_overview: BudgetOverview,
    /// Recurring payment totals.
    pub recurring: RecurringTotals,
    /// Active recurring payments due on or before `as_of`.
    pub due_payments: Vec<RecurringPayment>,
    /// Account balances by currency.
    pub balances: BTreeMap<String, Decimal>,
}
