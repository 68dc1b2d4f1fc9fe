//! Transaction list filtering.

use clarity_shared::types::CategoryId;

use crate::models::Transaction;

/// Search and category filter for a transaction list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description.
    pub search: Option<String>,
    /// Only transactions in this category.
    pub category_id: Option<CategoryId>,
}

impl TransactionFilter {
    /// Returns true if `transaction` passes every set criterion.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|needle| {
            transaction
                .description
                .to_lowercase()
                .contains(&needle.trim().to_lowercase())
        });
        let matches_category = self
            .category_id
            .is_none_or(|id| transaction.category_id == Some(id));
        matches_search && matches_category
    }

    /// Transactions passing the filter, in their original order.
    #[must_use]
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}
