//! Category repository.

use std::collections::HashSet;

use clarity_core::defaults::default_categories;
use clarity_core::models::{Category, CategoryPatch, NewCategory};
use clarity_shared::AppResult;
use clarity_shared::types::CategoryId;
use tracing::info;

use super::collection_repository;
use crate::collection::EntityCollection;

/// Categories of the current identity, by name.
#[derive(Debug)]
pub struct CategoryRepository {
    collection: EntityCollection<Category>,
}

collection_repository!(CategoryRepository, Category);

impl CategoryRepository {
    /// Validates and creates a category.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any store call, or the store error.
    pub async fn create(&self, input: &NewCategory) -> AppResult<Category> {
        input.validate()?;
        self.collection.insert(input).await
    }

    /// Validates and applies a patch.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or not-found if the identity owns no such category.
    pub async fn update(&self, id: CategoryId, patch: &CategoryPatch) -> AppResult<Category> {
        patch.validate()?;
        self.collection.patch(id, patch).await
    }

    /// Deletes a category. Transactions keep existing uncategorized and the
    /// category's budgets go with it.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no identity or the store fails.
    pub async fn delete(&self, id: CategoryId) -> AppResult<()> {
        self.collection.remove(id).await
    }

    /// Creates every default category whose name is not taken yet.
    ///
    /// Returns the number of categories created. Names compare case-insensitively.
    ///
    /// # Errors
    ///
    /// Stops at the first failed insert; categories created before it remain.
    pub async fn seed_defaults(&self) -> AppResult<usize> {
        let existing: HashSet<String> = self
            .records()
            .await
            .into_iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        let mut created = 0;
        for input in default_categories() {
            if existing.contains(&input.name.to_lowercase()) {
                continue;
            }
            input.validate()?;
            self.collection.insert(&input).await?;
            created += 1;
        }

        info!(created, "Default categories seeded");
        Ok(created)
    }
}
