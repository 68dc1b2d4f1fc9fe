//! Record store abstraction.
//!
//! A record store holds rows in named tables, every row owned by one identity.
//! Reads and writes are always scoped to an owner; a row owned by someone else
//! behaves exactly like a missing row.

pub mod error;
pub mod memory;
pub mod rest;

pub use error::StoreError;
pub use memory::{MemoryStore, Operation};
pub use rest::RestStore;

use async_trait::async_trait;
use clarity_shared::types::UserId;
use serde_json::Value;
use uuid::Uuid;

/// A row as exchanged with the store: a JSON object keyed by column.
pub type Row = serde_json::Map<String, Value>;

/// Tables known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Bank and cash accounts.
    Accounts,
    /// Spending categories.
    Categories,
    /// Transactions.
    Transactions,
    /// Budgets.
    Budgets,
    /// Recurring payments.
    RecurringPayments,
}

impl Table {
    /// Every table.
    pub const ALL: [Self; 5] = [
        Self::Accounts,
        Self::Categories,
        Self::Transactions,
        Self::Budgets,
        Self::RecurringPayments,
    ];

    /// Table name on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accounts => "accounts",
            Self::Categories => "categories",
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::RecurringPayments => "recurring_payments",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name.
    pub column: &'static str,
    /// Required value.
    pub value: Value,
}

impl Filter {
    /// `column = value`.
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }

    /// Returns true if `row` satisfies the filter.
    #[must_use]
    pub fn matches(&self, row: &Row) -> bool {
        row.get(self.column) == Some(&self.value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Sort key on one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Column name.
    pub column: &'static str,
    /// Direction.
    pub direction: Direction,
}

impl Order {
    /// Ascending by `column`.
    #[must_use]
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Asc,
        }
    }

    /// Descending by `column`.
    #[must_use]
    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: Direction::Desc,
        }
    }
}

/// Identity-scoped access to the hosted tables.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows of `table` owned by `owner` that pass every filter, sorted by `ordering`.
    async fn query(
        &self,
        table: Table,
        owner: UserId,
        filters: &[Filter],
        ordering: &[Order],
    ) -> Result<Vec<Row>, StoreError>;

    /// Inserts `row`, which must carry its `user_id`, and returns the stored row.
    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError>;

    /// Applies `patch` to the row with `id` owned by `owner` and returns the stored row.
    ///
    /// Returns [`StoreError::NotFound`] if no such row exists.
    async fn update(
        &self,
        table: Table,
        id: Uuid,
        owner: UserId,
        patch: Row,
    ) -> Result<Row, StoreError>;

    /// Deletes the row with `id` owned by `owner`. Deleting nothing succeeds.
    async fn delete(&self, table: Table, id: Uuid, owner: UserId) -> Result<(), StoreError>;
}
