//! Recurring payment repository.

use clarity_core::models::{NewRecurringPayment, RecurringPayment, RecurringPaymentPatch};
use clarity_shared::types::RecurringPaymentId;
use clarity_shared::{AppError, AppResult};
use tracing::info;

use super::collection_repository;
use crate::collection::EntityCollection;

/// Recurring payments of the current identity, newest first.
#[derive(Debug)]
pub struct RecurringPaymentRepository {
    collection: EntityCollection<RecurringPayment>,
}

collection_repository!(RecurringPaymentRepository, RecurringPayment);

impl RecurringPaymentRepository {
    async fn current(&self, id: RecurringPaymentId) -> AppResult<RecurringPayment> {
        self.find(id).await.ok_or_else(|| {
            AppError::NotFound(format!("Recurring payment {id} is not in the collection"))
        })
    }

    /// Validates a payment, signs its amount by direction, and creates it.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call, or the store error.
    pub async fn create(&self, input: NewRecurringPayment) -> AppResult<RecurringPayment> {
        let input = input.normalized()?;
        self.collection.insert(&input).await
    }

    /// Validates and applies a patch, re-signing the amount when the amount
    /// or direction changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or not-found if the identity owns no such payment.
    pub async fn update(
        &self,
        id: RecurringPaymentId,
        patch: RecurringPaymentPatch,
    ) -> AppResult<RecurringPayment> {
        let current = if patch.needs_current() {
            Some(self.current(id).await?)
        } else {
            None
        };
        let patch = patch.normalized(current.as_ref())?;
        self.collection.patch(id, &patch).await
    }

    /// Deletes a recurring payment.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete(&self, id: RecurringPaymentId) -> AppResult<()> {
        self.collection.remove(id).await
    }

    /// Pauses or resumes a payment.
    ///
    /// # Errors
    ///
    /// Returns not-found if the identity owns no such payment.
    pub async fn toggle_active(
        &self,
        id: RecurringPaymentId,
        is_active: bool,
    ) -> AppResult<RecurringPayment> {
        let patch = RecurringPaymentPatch {
            is_active: Some(is_active),
            ..RecurringPaymentPatch::default()
        };
        self.collection.patch(id, &patch).await
    }

    /// Marks the pending occurrence as paid and schedules the next one.
    ///
    /// # Errors
    ///
    /// Returns not-found if the payment is not in the collection, or a
    /// validation error if the next date is out of range.
    pub async fn advance(&self, id: RecurringPaymentId) -> AppResult<RecurringPayment> {
        let patch = self.current(id).await?.advance()?;
        let updated = self.collection.patch(id, &patch).await?;
        info!(
            payment_id = %id,
            next_payment_date = %updated.next_payment_date,
            "Recurring payment advanced"
        );
        Ok(updated)
    }
}
