//! Budget summary types.

use chrono::NaiveDate;
use clarity_shared::types::{BudgetId, CategoryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::PeriodType;

/// Where spending stands against the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spent less than allocated.
    UnderBudget,
    /// Spent exactly the allocation.
    OnBudget,
    /// Spent more than allocated. A valid, displayed state.
    OverBudget,
}

/// Spending against one active budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budgeted category.
    pub category_id: CategoryId,
    /// Category name.
    pub category_name: String,
    /// Category icon.
    pub category_icon: String,
    /// Category color.
    pub category_color: String,
    /// Allocated amount.
    pub allocated_amount: Decimal,
    /// Period length.
    pub period_type: PeriodType,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Absolute expenses in the period.
    pub spent_amount: Decimal,
    /// `allocated_amount - spent_amount`; negative when over budget.
    pub remaining_amount: Decimal,
    /// `spent / allocated * 100`, unclamped; 0 when nothing is allocated.
    pub utilization_percentage: Decimal,
    /// Utilization clamped to `[0, 100]` for progress bars.
    pub progress_percentage: Decimal,
    /// Status derived from the remaining amount.
    pub status: BudgetStatus,
    /// Number of expenses counted.
    pub transaction_count: usize,
}

/// Totals across all budget summaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetOverview {
    /// Sum of allocations.
    pub total_allocated: Decimal,
    /// Sum of spending.
    pub total_spent: Decimal,
    /// `total_allocated - total_spent`.
    pub total_remaining: Decimal,
    /// Overall utilization; 0 when nothing is allocated.
    pub utilization_percentage: Decimal,
    /// Overall utilization clamped to `[0, 100]`.
    pub progress_percentage: Decimal,
    /// Number of budgets over their allocation.
    pub over_budget_count: usize,
}
