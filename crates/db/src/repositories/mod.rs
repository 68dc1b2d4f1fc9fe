//! Per-entity repositories.
//!
//! Each repository wraps an [`EntityCollection`](crate::collection::EntityCollection)
//! and adds input validation plus the operations specific to its entity. The
//! snapshot accessors (`records`, `find`, `fetch`, ...) are reached through `Deref`.

/// Implements construction and `Deref` to the wrapped collection.
macro_rules! collection_repository {
    ($repo:ident, $entity:ty) => {
        impl $repo {
            /// Creates a repository with an empty collection.
            #[must_use]
            pub fn new(store: std::sync::Arc<dyn $crate::store::RecordStore>) -> Self {
                Self {
                    collection: $crate::collection::EntityCollection::new(store),
                }
            }
        }

        impl std::ops::Deref for $repo {
            type Target = $crate::collection::EntityCollection<$entity>;

            fn deref(&self) -> &Self::Target {
                &self.collection
            }
        }
    };
}

pub(crate) use collection_repository;

pub mod account;
pub mod budget;
pub mod category;
pub mod recurring;
pub mod transaction;

pub use account::AccountRepository;
pub use budget::BudgetRepository;
pub use category::CategoryRepository;
pub use recurring::RecurringPaymentRepository;
pub use transaction::TransactionRepository;
