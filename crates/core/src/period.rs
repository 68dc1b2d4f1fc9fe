//! Calendar periods: month keys, budget periods, and payment frequencies.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// A calendar month, rendered as `YYYY-MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

/// Error parsing a `YYYY-MM` month key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month key: {0}")]
pub struct ParseMonthKeyError(String);

impl MonthKey {
    /// Creates a month key. Returns `None` if `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Month number, 1-based.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days(self) -> u32 {
        self.last_day().day()
    }

    /// Following month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Preceding month.
    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Returns true if `date` falls in this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = ParseMonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthKeyError(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(err)?;
        let year = year.parse().map_err(|_| err())?;
        let month = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

/// Length of a budget period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// Sunday through Saturday.
    Weekly,
    /// First through last day of a calendar month.
    #[default]
    Monthly,
    /// January 1 through December 31.
    Yearly,
}

impl PeriodType {
    /// Inclusive bounds of the period containing `reference`.
    #[must_use]
    pub fn bounds(self, reference: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Weekly => {
                let back = Days::new(u64::from(reference.weekday().num_days_from_sunday()));
                let start = reference.checked_sub_days(back).unwrap_or(reference);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                (start, end)
            }
            Self::Monthly => {
                let month = MonthKey::of(reference);
                (month.first_day(), month.last_day())
            }
            Self::Yearly => {
                let year = reference.year();
                (
                    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(reference),
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(reference),
                )
            }
        }
    }
}

/// How often a recurring payment repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Same day each month, clamped to the month's last day.
    #[default]
    Monthly,
    /// Same day each year, Feb 29 clamped to Feb 28.
    Yearly,
}

impl Frequency {
    /// Next occurrence after `date`, or `None` past the end of the calendar.
    ///
    /// Monthly and yearly occurrences land on `anchor_day` of the target month,
    /// clamped to its last day, so a clamped date does not shift later ones.
    /// Daily and weekly occurrences ignore the anchor.
    #[must_use]
    pub fn next_after(self, date: NaiveDate, anchor_day: u32) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_days(Days::new(1)),
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => anchored(date, Months::new(1), anchor_day),
            Self::Yearly => anchored(date, Months::new(12), anchor_day),
        }
    }
}

/// `anchor_day` of the month `months` after the month of `date`, clamped.
fn anchored(date: NaiveDate, months: Months, anchor_day: u32) -> Option<NaiveDate> {
    let target = date.with_day(1)?.checked_add_months(months)?;
    let last = MonthKey::of(target).days();
    target.with_day(anchor_day.clamp(1, last))
}
