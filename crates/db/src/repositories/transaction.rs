//! Transaction repository.

use clarity_core::models::{NewTransaction, Transaction, TransactionPatch};
use clarity_shared::types::TransactionId;
use clarity_shared::{AppError, AppResult};

use super::collection_repository;
use crate::collection::EntityCollection;

/// Transactions of the current identity, newest booking date first.
#[derive(Debug)]
pub struct TransactionRepository {
    collection: EntityCollection<Transaction>,
}

collection_repository!(TransactionRepository, Transaction);

impl TransactionRepository {
    /// Validates a transaction, signs its amount by type, and creates it.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call, or the store error.
    pub async fn create(&self, input: NewTransaction) -> AppResult<Transaction> {
        let input = input.normalized()?;
        self.collection.insert(&input).await
    }

    /// Validates and applies a patch, re-signing the amount when the amount
    /// or type changes.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or not-found if the identity owns no such
    /// transaction.
    pub async fn update(&self, id: TransactionId, patch: TransactionPatch) -> AppResult<Transaction> {
        let current = if patch.needs_current() {
            Some(self.find(id).await.ok_or_else(|| {
                AppError::NotFound(format!("Transaction {id} is not in the collection"))
            })?)
        } else {
            None
        };
        let patch = patch.normalized(current.as_ref())?;
        self.collection.patch(id, &patch).await
    }

    /// Deletes a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete(&self, id: TransactionId) -> AppResult<()> {
        self.collection.remove(id).await
    }
}
