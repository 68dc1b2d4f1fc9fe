//! Budget service for utilization calculation.

use rust_decimal::Decimal;

use super::types::{BudgetOverview, BudgetStatus, BudgetSummary};
use crate::models::category::{FALLBACK_COLOR, FALLBACK_ICON};
use crate::models::{Budget, Category, Transaction};

/// Name shown for a budget whose category is not in the category list.
pub const UNKNOWN_CATEGORY: &str = "Unknown category";

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Utilization percentage: `spent / allocated * 100`, rounded to 2 dp.
    ///
    /// A zero (or negative) allocation yields 0 instead of dividing by zero.
    /// A ratio beyond the `Decimal` range saturates to `Decimal::MAX` (or
    /// `Decimal::MIN` for negative spending).
    #[must_use]
    pub fn utilization_percent(spent: Decimal, allocated: Decimal) -> Decimal {
        if allocated <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        spent
            .checked_div(allocated)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map_or_else(
                || {
                    if spent.is_sign_negative() {
                        Decimal::MIN
                    } else {
                        Decimal::MAX
                    }
                },
                |percent| percent.round_dp(2),
            )
    }

    /// Clamps a utilization percentage to `[0, 100]` for display.
    #[must_use]
    pub fn progress_percent(utilization: Decimal) -> Decimal {
        utilization.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    /// Status from the remaining amount.
    #[must_use]
    pub fn status(remaining: Decimal) -> BudgetStatus {
        match remaining.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => BudgetStatus::UnderBudget,
            std::cmp::Ordering::Less => BudgetStatus::OverBudget,
            std::cmp::Ordering::Equal => BudgetStatus::OnBudget,
        }
    }

    /// Summarizes one budget.
    ///
    /// Counts expense transactions in the budget's category dated within
    /// `[period_start, period_end]`, both ends inclusive.
    #[must_use]
    pub fn summarize(
        budget: &Budget,
        category: Option<&Category>,
        transactions: &[Transaction],
    ) -> BudgetSummary {
        let (spent_amount, transaction_count) = transactions
            .iter()
            .filter(|t| {
                t.is_expense()
                    && t.category_id == Some(budget.category_id)
                    && budget.covers(t.transaction_date)
            })
            .fold((Decimal::ZERO, 0), |(sum, count), t| {
                (sum.saturating_add(t.amount.abs()), count + 1)
            });

        let remaining_amount = budget.allocated_amount.saturating_sub(spent_amount);
        let utilization_percentage =
            Self::utilization_percent(spent_amount, budget.allocated_amount);

        BudgetSummary {
            budget_id: budget.id,
            category_id: budget.category_id,
            category_name: category.map_or_else(|| UNKNOWN_CATEGORY.to_string(), |c| c.name.clone()),
            category_icon: category.map_or_else(|| FALLBACK_ICON.to_string(), |c| c.icon.clone()),
            category_color: category
                .map_or_else(|| FALLBACK_COLOR.to_string(), |c| c.color.clone()),
            allocated_amount: budget.allocated_amount,
            period_type: budget.period_type,
            period_start: budget.period_start,
            period_end: budget.period_end,
            spent_amount,
            remaining_amount,
            utilization_percentage,
            progress_percentage: Self::progress_percent(utilization_percentage),
            status: Self::status(remaining_amount),
            transaction_count,
        }
    }

    /// Summaries for every active budget, in input order.
    #[must_use]
    pub fn summaries(
        budgets: &[Budget],
        categories: &[Category],
        transactions: &[Transaction],
    ) -> Vec<BudgetSummary> {
        budgets
            .iter()
            .filter(|b| b.is_active)
            .map(|budget| {
                let category = categories.iter().find(|c| c.id == budget.category_id);
                Self::summarize(budget, category, transactions)
            })
            .collect()
    }

    /// Totals across summaries.
    #[must_use]
    pub fn overview(summaries: &[BudgetSummary]) -> BudgetOverview {
        let total_allocated = saturating_sum(summaries.iter().map(|s| s.allocated_amount));
        let total_spent = saturating_sum(summaries.iter().map(|s| s.spent_amount));
        let utilization_percentage = Self::utilization_percent(total_spent, total_allocated);

        BudgetOverview {
            total_allocated,
            total_spent,
            total_remaining: total_allocated.saturating_sub(total_spent),
            utilization_percentage,
            progress_percentage: Self::progress_percent(utilization_percentage),
            over_budget_count: summaries
                .iter()
                .filter(|s| s.status == BudgetStatus::OverBudget)
                .count(),
        }
    }
}

/// Sum that stops at the `Decimal` bounds instead of overflowing.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}
