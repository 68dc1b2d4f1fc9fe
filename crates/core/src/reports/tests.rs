//! Tests for derived aggregates.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::{ReportService, Snapshots};
use crate::fixtures::{account, budget, category, date, recurring, transaction};
use crate::models::Transaction;
use crate::period::MonthKey;

fn january() -> MonthKey {
    MonthKey::new(2025, 1).unwrap()
}

#[test]
fn test_month_totals_net() {
    let mut transactions = vec![
        transaction(dec!(4500), "2025-01-01", None),
        transaction(dec!(-2000), "2025-01-03", None),
        transaction(dec!(-1200), "2025-01-20", None),
    ];

    let totals = ReportService::month_totals(&transactions, january());
    assert_eq!(totals.total_income, dec!(4500));
    assert_eq!(totals.total_expenses, dec!(3200));
    assert_eq!(totals.net, dec!(1300));

    transactions.push(transaction(dec!(-100), "2025-01-21", None));
    let totals = ReportService::month_totals(&transactions, january());
    assert_eq!(totals.net, dec!(1200));
    assert_eq!(totals.expense_count, 3);
    assert_eq!(totals.income_count, 1);
    assert_eq!(totals.total_transactions, 4);
}

#[test]
fn test_month_totals_ignore_other_months() {
    let transactions = vec![
        transaction(dec!(-50), "2024-12-31", None),
        transaction(dec!(-20), "2025-01-31", None),
        transaction(dec!(-70), "2025-02-01", None),
    ];

    let totals = ReportService::month_totals(&transactions, january());

    assert_eq!(totals.total_expenses, dec!(20));
    assert_eq!(totals.total_transactions, 1);
}

#[test]
fn test_monthly_totals_partitions_chronologically() {
    let transactions = vec![
        transaction(dec!(-30), "2025-02-10", None),
        transaction(dec!(1000), "2025-01-05", None),
        transaction(dec!(-10), "2025-01-06", None),
    ];

    let monthly = ReportService::monthly_totals(&transactions);
    let keys: Vec<String> = monthly.keys().map(ToString::to_string).collect();

    assert_eq!(keys, vec!["2025-01", "2025-02"]);
    assert_eq!(monthly[&january()].totals.net, dec!(990));
    assert_eq!(monthly[&january().next()].totals.total_expenses, dec!(30));
}

#[test]
fn test_empty_inputs_yield_zeros() {
    let none: Vec<Transaction> = Vec::new();
    assert_eq!(ReportService::period_totals(&none), super::PeriodTotals::default());
    assert!(ReportService::monthly_totals(&[]).is_empty());
    assert!(ReportService::category_spending(&[], &[], january()).is_empty());
    assert_eq!(
        ReportService::category_overview(&[], &[], january()),
        super::CategoryOverview::default()
    );
    assert_eq!(ReportService::recurring_totals(&[]), super::RecurringTotals::default());
    assert!(ReportService::account_totals(&[]).is_empty());
}

#[test]
fn test_category_spending_excludes_uncategorized() {
    let food = category("Food & Dining", Some(dec!(500)));
    let fun = category("Entertainment", None);
    let transactions = vec![
        transaction(dec!(-120), "2025-01-02", Some(food.id)),
        transaction(dec!(-80), "2025-01-09", Some(food.id)),
        transaction(dec!(-45), "2025-01-09", None),
        transaction(dec!(300), "2025-01-09", Some(food.id)),
        transaction(dec!(-999), "2025-02-01", Some(food.id)),
    ];

    let spending =
        ReportService::category_spending(&[food.clone(), fun.clone()], &transactions, january());

    assert_eq!(spending.len(), 2);
    assert_eq!(spending[0].total_spent, dec!(200));
    assert_eq!(spending[0].transaction_count, 2);
    assert_eq!(spending[0].average_amount, dec!(100));
    assert_eq!(spending[0].utilization_percentage, dec!(40));
    assert_eq!(spending[1].total_spent, Decimal::ZERO);
    assert_eq!(spending[1].average_amount, Decimal::ZERO);
    assert_eq!(spending[1].utilization_percentage, Decimal::ZERO);

    let overview = ReportService::category_overview(&spending, &transactions, january());
    assert_eq!(overview.total_spent, dec!(200));
    assert_eq!(overview.total_limit, dec!(500));
    assert_eq!(overview.utilization_percentage, dec!(40));
    assert_eq!(overview.uncategorized_spent, dec!(45));

    let totals = ReportService::month_totals(&transactions, january());
    assert_eq!(totals.total_expenses, dec!(245));
}

#[test]
fn test_recurring_totals_only_count_active() {
    let payments = vec![
        recurring("Salary", dec!(4500), true),
        recurring("Rent", dec!(-1500), true),
        recurring("Netflix", dec!(-45), true),
        recurring("Gym", dec!(-150), false),
    ];

    let totals = ReportService::recurring_totals(&payments);

    assert_eq!(totals.total_income, dec!(4500));
    assert_eq!(totals.total_expenses, dec!(1545));
    assert_eq!(totals.net, dec!(2955));
    assert_eq!(totals.active_count, 3);
    assert_eq!(totals.inactive_count, 1);
}

#[test]
fn test_account_totals_group_by_currency() {
    let accounts = vec![
        account("Main", dec!(1200.50), "RON"),
        account("Savings", dec!(8000), "RON"),
        account("Travel", dec!(300), "EUR"),
    ];

    let totals = ReportService::account_totals(&accounts);

    assert_eq!(totals.len(), 2);
    assert_eq!(totals["RON"], dec!(9200.50));
    assert_eq!(totals["EUR"], dec!(300));
}

#[test]
fn test_aggregates_saturate_at_decimal_bounds() {
    let food = category("Food", Some(dec!(0.01)));
    let transactions = vec![
        transaction(Decimal::MAX, "2025-01-01", None),
        transaction(Decimal::MAX, "2025-01-02", None),
        transaction(Decimal::MIN, "2025-01-03", Some(food.id)),
        transaction(Decimal::MIN, "2025-01-04", Some(food.id)),
        transaction(Decimal::MIN, "2025-01-05", None),
    ];

    let totals = ReportService::month_totals(&transactions, january());
    assert_eq!(totals.total_income, Decimal::MAX);
    assert_eq!(totals.total_expenses, Decimal::MAX);
    assert_eq!(totals.net, Decimal::ZERO);

    let spending =
        ReportService::category_spending(std::slice::from_ref(&food), &transactions, january());
    assert_eq!(spending[0].total_spent, Decimal::MAX);
    assert_eq!(spending[0].utilization_percentage, Decimal::MAX);

    let overview = ReportService::category_overview(&spending, &transactions, january());
    assert_eq!(overview.uncategorized_spent, Decimal::MAX);
    assert_eq!(overview.utilization_percentage, Decimal::MAX);

    let balances = ReportService::account_totals(&[
        account("Main", Decimal::MAX, "RON"),
        account("Savings", Decimal::MAX, "RON"),
    ]);
    assert_eq!(balances["RON"], Decimal::MAX);

    let bills = ReportService::recurring_totals(&[
        recurring("Rent", Decimal::MIN, true),
        recurring("Loan", Decimal::MIN, true),
    ]);
    assert_eq!(bills.total_expenses, Decimal::MAX);
    assert_eq!(bills.net, Decimal::MIN);
}

#[test]
fn test_dashboard_snapshot() {
    let food = category("Food & Dining", None);
    let transactions: Vec<Transaction> = (1..=6)
        .rev()
        .map(|d| transaction(dec!(-10), &format!("2025-01-0{d}"), Some(food.id)))
        .collect();
    let budgets: Vec<_> = (0..5)
        .map(|_| budget(food.id, dec!(100), "2025-01-01", "2025-01-31"))
        .collect();
    let mut due = recurring("Rent", dec!(-1500), true);
    due.next_payment_date = date(2025, 1, 10);
    let payments = vec![due.clone(), recurring("Salary", dec!(4500), true)];
    let accounts = vec![account("Main", dec!(100), "RON")];

    let dashboard = ReportService::dashboard(
        Snapshots {
            accounts: &accounts,
            categories: std::slice::from_ref(&food),
            transactions: &transactions,
            budgets: &budgets,
            recurring_payments: &payments,
        },
        date(2025, 1, 15),
    );

    assert_eq!(dashboard.month, january());
    assert_eq!(dashboard.month_totals.total_expenses, dec!(60));
    assert_eq!(dashboard.recent_transactions.len(), 4);
    assert_eq!(dashboard.recent_transactions[0].id, transactions[0].id);
    assert_eq!(dashboard.top_budgets.len(), 4);
    assert_eq!(dashboard.budget_overview.total_allocated, dec!(500));
    assert_eq!(dashboard.top_budgets[0].spent_amount, dec!(60));
    assert_eq!(dashboard.due_payments.len(), 1);
    assert_eq!(dashboard.due_payments[0].id, due.id);
    assert_eq!(dashboard.balances["RON"], dec!(100));
}

proptest! {
    /// Net always equals income minus expenses, and counts add up.
    #[test]
    fn test_period_totals_consistent(
        amounts in prop::collection::vec(-100_000i64..100_000, 0..40),
    ) {
        let transactions: Vec<Transaction> = amounts
            .iter()
            .filter(|a| **a != 0)
            .map(|a| transaction(Decimal::new(*a, 2), "2025-01-15", None))
            .collect();

        let totals = ReportService::period_totals(&transactions);
        let signed: Decimal = transactions.iter().map(|t| t.amount).sum();

        prop_assert_eq!(totals.net, totals.total_income - totals.total_expenses);
        prop_assert_eq!(totals.net, signed);
        prop_assert!(totals.total_expenses >= Decimal::ZERO);
        prop_assert_eq!(totals.income_count + totals.expense_count, totals.total_transactions);
        prop_assert_eq!(totals.total_transactions, transactions.len());
    }

    /// Summing every month gives the all-time totals.
    #[test]
    fn test_monthly_totals_sum_to_period_totals(
        entries in prop::collection::vec((1u32..=12, 1u32..=28, 1i64..10_000, any::<bool>()), 0..30),
    ) {
        let transactions: Vec<Transaction> = entries
            .iter()
            .map(|(m, d, a, expense)| {
                let amount = if *expense { -Decimal::from(*a) } else { Decimal::from(*a) };
                transaction(amount, &date(2025, *m, *d).to_string(), None)
            })
            .collect();

        let all = ReportService::period_totals(&transactions);
        let monthly = ReportService::monthly_totals(&transactions);
        let net: Decimal = monthly.values().map(|s| s.totals.net).sum();
        let count: usize = monthly.values().map(|s| s.totals.total_transactions).sum();

        prop_assert_eq!(net, all.net);
        prop_assert_eq!(count, all.total_transactions);
    }
}
