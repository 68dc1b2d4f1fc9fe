//! Data access layer for Clarity.
//!
//! This crate provides:
//! - The identity-scoped [`RecordStore`](store::RecordStore) abstraction with
//!   in-memory and PostgREST implementations
//! - Entity collections that fetch on identity change and refetch after writes
//! - Per-entity repositories adding validation and entity-specific operations
//! - The [`Session`] identity gate

pub mod collection;
pub mod entity;
pub mod repositories;
pub mod session;
pub mod store;

pub use collection::EntityCollection;
pub use entity::Entity;
pub use repositories::{
    AccountRepository, BudgetRepository, CategoryRepository, RecurringPaymentRepository,
    TransactionRepository,
};
pub use session::Session;
pub use store::{MemoryStore, RecordStore, RestStore, StoreError, Table};
