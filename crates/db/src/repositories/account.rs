//! Account repository.

use clarity_core::models::{Account, AccountPatch, NewAccount};
use clarity_shared::AppResult;
use clarity_shared::types::AccountId;

use super::collection_repository;
use crate::collection::EntityCollection;

/// Accounts of the current identity, newest first.
#[derive(Debug)]
pub struct AccountRepository {
    collection: EntityCollection<Account>,
}

collection_repository!(AccountRepository, Account);

impl AccountRepository {
    /// Validates and creates an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call, or the store error.
    pub async fn create(&self, input: &NewAccount) -> AppResult<Account> {
        input.validate()?;
        self.collection.insert(input).await
    }

    /// Validates and applies a patch.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or not-found if the identity owns no such account.
    pub async fn update(&self, id: AccountId, patch: &AccountPatch) -> AppResult<Account> {
        patch.validate()?;
        self.collection.patch(id, patch).await
    }

    /// Deletes an account. Its transactions and recurring payments keep
    /// existing with the account reference cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete(&self, id: AccountId) -> AppResult<()> {
        self.collection.remove(id).await
    }
}
