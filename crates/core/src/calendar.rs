//! Calendar view: per-day transaction grouping and month grids.

use chrono::{Datelike, NaiveDate};
use clarity_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Transaction;
use crate::period::MonthKey;

/// Transactions booked on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    /// The day.
    pub date: NaiveDate,
    /// Signed sum of amounts.
    pub total: Decimal,
    /// Sum of income amounts.
    pub income: Decimal,
    /// Sum of absolute expense amounts.
    pub expenses: Decimal,
    /// Number of transactions.
    pub count: usize,
    /// Transactions on the day, in input order.
    pub transaction_ids: Vec<TransactionId>,
}

impl CalendarDay {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total: Decimal::ZERO,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
            count: 0,
            transaction_ids: Vec::new(),
        }
    }

    fn add(&mut self, transaction: &Transaction) {
        self.total = self.total.saturating_add(transaction.amount);
        if transaction.is_expense() {
            self.expenses = self.expenses.saturating_add(transaction.amount.abs());
        } else {
            self.income = self.income.saturating_add(transaction.amount);
        }
        self.count += 1;
        self.transaction_ids.push(transaction.id);
    }
}

/// Groups transactions by exact booking date.
#[must_use]
pub fn group_by_day(transactions: &[Transaction]) -> BTreeMap<NaiveDate, CalendarDay> {
    let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();
    for t in transactions {
        days.entry(t.transaction_date)
            .or_insert_with(|| CalendarDay::empty(t.transaction_date))
            .add(t);
    }
    days
}

/// Month grid with weeks starting on Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarMonth {
    /// The month shown.
    pub month: MonthKey,
    /// Blank cells before the first day.
    pub leading_blanks: u32,
    /// Number of days in the month.
    pub days: u32,
}

impl CalendarMonth {
    /// Grid for `month`.
    #[must_use]
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            leading_blanks: month.first_day().weekday().num_days_from_sunday(),
            days: month.days(),
        }
    }

    /// Cells in display order: `None` for leading blanks, then day numbers.
    #[must_use]
    pub fn cells(&self) -> Vec<Option<u32>> {
        std::iter::repeat_n(None, self.leading_blanks as usize)
            .chain((1..=self.days).map(Some))
            .collect()
    }

    /// Date of day `day` in this month, if it exists.
    #[must_use]
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.month.year(), self.month.month(), day)
    }

    /// Grid for the previous month.
    #[must_use]
    pub fn prev(&self) -> Self {
        Self::new(self.month.prev())
    }

    /// Grid for the following month.
    #[must_use]
    pub fn next(&self) -> Self {
        Self::new(self.month.next())
    }
}
