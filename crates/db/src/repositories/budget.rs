//! Budget repository.

use clarity_core::models::{Budget, BudgetPatch, NewBudget};
use clarity_shared::AppResult;
use clarity_shared::types::BudgetId;

use super::collection_repository;
use crate::collection::EntityCollection;

/// Active budgets of the current identity, newest first.
#[derive(Debug)]
pub struct BudgetRepository {
    collection: EntityCollection<Budget>,
}

collection_repository!(BudgetRepository, Budget);

impl BudgetRepository {
    /// Validates and creates a budget.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call, or the store error.
    pub async fn create(&self, input: &NewBudget) -> AppResult<Budget> {
        input.validate()?;
        self.collection.insert(input).await
    }

    /// Validates and applies a patch. A patch moving only one end of the
    /// period is checked against the stored other end; one changing the period
    /// type without both ends gets bounds derived for the new type.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or not-found if the identity owns no such budget.
    pub async fn update(&self, id: BudgetId, patch: BudgetPatch) -> AppResult<Budget> {
        let current = self.find(id).await;
        let patch = patch.normalized(current.as_ref())?;
        self.collection.patch(id, &patch).await
    }

    /// Deletes a budget.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete(&self, id: BudgetId) -> AppResult<()> {
        self.collection.remove(id).await
    }
}
