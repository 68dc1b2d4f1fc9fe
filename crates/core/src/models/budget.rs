//! Budgets: an allocated amount for one category over one period.

use chrono::{DateTime, NaiveDate, Utc};
use clarity_shared::types::{BudgetId, CategoryId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::PeriodType;
use crate::validation::{ValidationError, require_positive};

/// A budget record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning identity.
    pub user_id: UserId,
    /// Budgeted category.
    pub category_id: CategoryId,
    /// Allocated amount.
    pub allocated_amount: Decimal,
    /// Period length.
    #[serde(default)]
    pub period_type: PeriodType,
    /// First day of the period (inclusive).
    pub period_start: NaiveDate,
    /// Last day of the period (inclusive).
    pub period_end: NaiveDate,
    /// Whether the budget is active.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

const fn default_active() -> bool {
    true
}

impl Budget {
    /// Returns true if `date` falls within the period, both ends inclusive.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.period_start <= date && date <= self.period_end
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBudget {
    /// Budgeted category.
    pub category_id: CategoryId,
    /// Allocated amount.
    pub allocated_amount: Decimal,
    /// Period length.
    pub period_type: PeriodType,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Whether the budget is active.
    pub is_active: bool,
}

impl NewBudget {
    /// Creates an active budget for the period of `period_type` containing `reference`.
    #[must_use]
    pub fn for_period(
        category_id: CategoryId,
        allocated_amount: Decimal,
        period_type: PeriodType,
        reference: NaiveDate,
    ) -> Self {
        let (period_start, period_end) = period_type.bounds(reference);
        Self {
            category_id,
            allocated_amount,
            period_type,
            period_start,
            period_end,
            is_active: true,
        }
    }

    /// Validates the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the period is inverted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("allocated_amount", self.allocated_amount)?;
        check_period(self.period_start, self.period_end)
    }
}

/// Sparse update for a budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetPatch {
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// New allocated amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_amount: Option<Decimal>,
    /// New period length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    /// New period start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_start: Option<NaiveDate>,
    /// New period end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<NaiveDate>,
    /// New active flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl BudgetPatch {
    /// Re-derives the period bounds when the period type changes without both
    /// bounds, then validates.
    ///
    /// The bounds come from the period containing the given start, else the
    /// given end, else the stored start.
    ///
    /// # Errors
    ///
    /// Returns an error if the bounds cannot be derived without `current`, or
    /// if [`validate`](Self::validate) fails.
    pub fn normalized(mut self, current: Option<&Budget>) -> Result<Self, ValidationError> {
        if let Some(period_type) = self.period_type
            && (self.period_start.is_none() || self.period_end.is_none())
        {
            let reference = self
                .period_start
                .or(self.period_end)
                .or_else(|| current.map(|b| b.period_start))
                .ok_or(ValidationError::Required("period_start"))?;
            let (start, end) = period_type.bounds(reference);
            self.period_start = Some(start);
            self.period_end = Some(end);
        }
        self.validate(current)?;
        Ok(self)
    }

    /// Validates the patch against the stored budget, if known.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the resulting period is inverted.
    pub fn validate(&self, current: Option<&Budget>) -> Result<(), ValidationError> {
        if let Some(amount) = self.allocated_amount {
            require_positive("allocated_amount", amount)?;
        }
        let start = self.period_start.or_else(|| current.map(|b| b.period_start));
        let end = self.period_end.or_else(|| current.map(|b| b.period_end));
        if let (Some(start), Some(end)) = (start, end) {
            check_period(start, end)?;
        }
        Ok(())
    }
}

fn check_period(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::InvalidPeriod { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_for_period_derives_bounds() {
        let input = NewBudget::for_period(
            CategoryId::new(),
            dec!(800),
            PeriodType::Monthly,
            date(2025, 2, 14),
        );
        assert_eq!(input.period_start, date(2025, 2, 1));
        assert_eq!(input.period_end, date(2025, 2, 28));
        assert!(input.is_active);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let input = NewBudget::for_period(
            CategoryId::new(),
            dec!(0),
            PeriodType::Monthly,
            date(2025, 2, 14),
        );
        assert!(matches!(
            input.validate(),
            Err(ValidationError::NonPositive { .. })
        ));
    }

    #[test]
    fn test_patch_checks_period_against_current() {
        let current = Budget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            category_id: CategoryId::new(),
            allocated_amount: dec!(500),
            period_type: PeriodType::Monthly,
            period_start: date(2025, 1, 1),
            period_end: date(2025, 1, 31),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let patch = BudgetPatch {
            period_end: Some(date(2024, 12, 31)),
            ..BudgetPatch::default()
        };
        assert!(matches!(
            patch.validate(Some(&current)),
            Err(ValidationError::InvalidPeriod { .. })
        ));
        assert!(patch.validate(None).is_ok());
    }

    #[test]
    fn test_patch_changing_type_rederives_bounds() {
        let current = Budget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            category_id: CategoryId::new(),
            allocated_amount: dec!(500),
            period_type: PeriodType::Monthly,
            period_start: date(2025, 1, 1),
            period_end: date(2025, 1, 31),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let weekly = BudgetPatch {
            period_type: Some(PeriodType::Weekly),
            ..BudgetPatch::default()
        };

        let patch = weekly.clone().normalized(Some(&current)).unwrap();
        // Jan 1 2025 is a Wednesday
        assert_eq!(patch.period_start, Some(date(2024, 12, 29)));
        assert_eq!(patch.period_end, Some(date(2025, 1, 4)));

        let moved = BudgetPatch {
            period_end: Some(date(2025, 3, 20)),
            ..weekly.clone()
        }
        .normalized(Some(&current))
        .unwrap();
        assert_eq!(moved.period_start, Some(date(2025, 3, 16)));
        assert_eq!(moved.period_end, Some(date(2025, 3, 22)));

        assert_eq!(
            weekly.normalized(None),
            Err(ValidationError::Required("period_start"))
        );
    }

    #[test]
    fn test_patch_with_both_bounds_is_kept() {
        let patch = BudgetPatch {
            period_type: Some(PeriodType::Yearly),
            period_start: Some(date(2025, 1, 1)),
            period_end: Some(date(2025, 6, 30)),
            ..BudgetPatch::default()
        };
        assert_eq!(patch.clone().normalized(None), Ok(patch));
    }

    #[test]
    fn test_covers_is_inclusive() {
        let budget = Budget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            category_id: CategoryId::new(),
            allocated_amount: dec!(500),
            period_type: PeriodType::Monthly,
            period_start: date(2025, 1, 1),
            period_end: date(2025, 1, 31),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(budget.covers(date(2025, 1, 1)));
        assert!(budget.covers(date(2025, 1, 31)));
        assert!(!budget.covers(date(2024, 12, 31)));
        assert!(!budget.covers(date(2025, 2, 1)));
    }
}
