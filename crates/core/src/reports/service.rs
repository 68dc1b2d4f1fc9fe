//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::types::{
    CategoryOverview, CategorySpending, Dashboard, MonthlySummary, PeriodTotals, RecurringTotals,
};
use crate::budget::BudgetService;
use crate::budget::service::saturating_sum;
use crate::models::{Account, Budget, Category, RecurringPayment, Transaction};
use crate::period::MonthKey;

/// Number of recent transactions on the dashboard.
pub const DASHBOARD_RECENT: usize = 4;

/// Number of budget summaries on the dashboard.
pub const DASHBOARD_BUDGETS: usize = 4;

/// Collection snapshots a dashboard is built from.
#[derive(Debug, Clone, Copy)]
pub struct Snapshots<'a> {
    /// Accounts.
    pub accounts: &'a [Account],
    /// Categories.
    pub categories: &'a [Category],
    /// Transactions, newest first.
    pub transactions: &'a [Transaction],
    /// Active budgets.
    pub budgets: &'a [Budget],
    /// Recurring payments.
    pub recurring_payments: &'a [RecurringPayment],
}

/// Service for computing derived aggregates.
pub struct ReportService;

impl ReportService {
    /// Totals over any set of transactions.
    #[must_use]
    pub fn period_totals<'a, I>(transactions: I) -> PeriodTotals
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = PeriodTotals::default();
        for t in transactions {
            if t.is_expense() {
                totals.total_expenses = totals.total_expenses.saturating_add(t.amount.abs());
                totals.expense_count += 1;
            } else {
                totals.total_income = totals.total_income.saturating_add(t.amount);
                totals.income_count += 1;
            }
            totals.total_transactions += 1;
        }
        totals.net = totals.total_income.saturating_sub(totals.total_expenses);
        totals
    }

    /// Totals for the transactions dated in `month`.
    #[must_use]
    pub fn month_totals(transactions: &[Transaction], month: MonthKey) -> PeriodTotals {
        Self::period_totals(
            transactions
                .iter()
                .filter(|t| month.contains(t.transaction_date)),
        )
    }

    /// Totals partitioned by month, in chronological order.
    #[must_use]
    pub fn monthly_totals(transactions: &[Transaction]) -> BTreeMap<MonthKey, MonthlySummary> {
        let mut by_month: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
        for t in transactions {
            by_month
                .entry(MonthKey::of(t.transaction_date))
                .or_default()
                .push(t);
        }

        by_month
            .into_iter()
            .map(|(month, items)| {
                let summary = MonthlySummary {
                    month,
                    totals: Self::period_totals(items),
                };
                (month, summary)
            })
            .collect()
    }

    /// Per-category expense spending in `month`, in category order.
    #[must_use]
    pub fn category_spending(
        categories: &[Category],
        transactions: &[Transaction],
        month: MonthKey,
    ) -> Vec<CategorySpending> {
        categories
            .iter()
            .map(|category| {
                let (total_spent, transaction_count) = transactions
                    .iter()
                    .filter(|t| {
                        t.is_expense()
                            && t.category_id == Some(category.id)
                            && month.contains(t.transaction_date)
                    })
                    .fold((Decimal::ZERO, 0usize), |(sum, count), t| {
                        (sum.saturating_add(t.amount.abs()), count + 1)
                    });

                let average_amount = if transaction_count == 0 {
                    Decimal::ZERO
                } else {
                    (total_spent / Decimal::from(transaction_count)).round_dp(2)
                };
                let utilization_percentage = category.budget_limit.map_or(Decimal::ZERO, |limit| {
                    BudgetService::utilization_percent(total_spent, limit)
                });

                CategorySpending {
                    category_id: category.id,
                    name: category.name.clone(),
                    icon: category.icon.clone(),
                    color: category.color.clone(),
                    total_spent,
                    transaction_count,
                    average_amount,
                    budget_limit: category.budget_limit,
                    utilization_percentage,
                }
            })
            .collect()
    }

    /// Totals across category spending.
    ///
    /// `transactions` and `month` supply the uncategorized expenses, which no
    /// category row counts.
    #[must_use]
    pub fn category_overview(
        spending: &[CategorySpending],
        transactions: &[Transaction],
        month: MonthKey,
    ) -> CategoryOverview {
        let total_spent = saturating_sum(spending.iter().map(|s| s.total_spent));
        let total_limit = saturating_sum(spending.iter().filter_map(|s| s.budget_limit));
        let uncategorized_spent = saturating_sum(
            transactions
                .iter()
                .filter(|t| {
                    t.is_expense() && t.category_id.is_none() && month.contains(t.transaction_date)
                })
                .map(|t| t.amount.abs()),
        );

        CategoryOverview {
            total_spent,
            total_limit,
            utilization_percentage: BudgetService::utilization_percent(total_spent, total_limit),
            uncategorized_spent,
        }
    }

    /// Totals over active recurring payments; paused ones are only counted.
    #[must_use]
    pub fn recurring_totals(payments: &[RecurringPayment]) -> RecurringTotals {
        let mut totals = RecurringTotals::default();
        for p in payments {
            if !p.is_active {
                totals.inactive_count += 1;
                continue;
            }
            totals.active_count += 1;
            totals.net = totals.net.saturating_add(p.amount);
            if p.amount.is_sign_negative() {
                totals.total_expenses = totals.total_expenses.saturating_add(p.amount.abs());
            } else {
                totals.total_income = totals.total_income.saturating_add(p.amount);
            }
        }
        totals
    }

    /// Account balances summed per currency.
    #[must_use]
    pub fn account_totals(accounts: &[Account]) -> BTreeMap<String, Decimal> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for account in accounts {
            let total = totals.entry(account.currency.clone()).or_default();
            *total = total.saturating_add(account.balance);
        }
        totals
    }

    /// Builds the dashboard for `today` from collection snapshots.
    #[must_use]
    pub fn dashboard(snapshots: Snapshots<'_>, today: NaiveDate) -> Dashboard {
        let month = MonthKey::of(today);
        let summaries = BudgetService::summaries(
            snapshots.budgets,
            snapshots.categories,
            snapshots.transactions,
        );

        Dashboard {
            as_of: today,
            month,
            month_totals: Self::month_totals(snapshots.transactions, month),
            recent_transactions: snapshots
                .transactions
                .iter()
                .take(DASHBOARD_RECENT)
                .cloned()
                .collect(),
            budget_overview: BudgetService::overview(&summaries),
            top_budgets: summaries.into_iter().take(DASHBOARD_BUDGETS).collect(),
            recurring: Self::recurring_totals(snapshots.recurring_payments),
            due_payments: snapshots
                .recurring_payments
                .iter()
                .filter(|p| p.is_due(today))
                .cloned()
                .collect(),
            balances: Self::account_totals(snapshots.accounts),
        }
    }
}
