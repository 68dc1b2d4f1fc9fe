//! Binding between domain records and store tables.

use clarity_core::models::{Account, Budget, Category, RecurringPayment, Transaction};
use clarity_shared::types::{AccountId, BudgetId, CategoryId, RecurringPaymentId, TransactionId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display};
use uuid::Uuid;

use crate::store::{Filter, Order, Table};

/// A record type stored in one table.
pub trait Entity: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    /// Typed primary key.
    type Id: Copy + Eq + Display + Debug + Into<Uuid> + Send + Sync;

    /// Table holding the records.
    const TABLE: Table;

    /// Primary key of this record.
    fn id(&self) -> Self::Id;

    /// Sort order of a fetched collection.
    const ORDERING: &'static [Order];

    /// Filters applied to every fetch besides the owner filter.
    fn filters() -> Vec<Filter> {
        Vec::new()
    }
}

impl Entity for Account {
    type Id = AccountId;
    const TABLE: Table = Table::Accounts;
    const ORDERING: &'static [Order] = &[Order::desc("created_at")];

    fn id(&self) -> AccountId {
        self.id
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const TABLE: Table = Table::Categories;
    const ORDERING: &'static [Order] = &[Order::asc("name")];

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl Entity for Transaction {
    type Id = TransactionId;
    const TABLE: Table = Table::Transactions;
    const ORDERING: &'static [Order] = &[Order::desc("transaction_date"), Order::desc("created_at")];

    fn id(&self) -> TransactionId {
        self.id
    }
}

impl Entity for Budget {
    type Id = BudgetId;
    const TABLE: Table = Table::Budgets;
    const ORDERING: &'static [Order] = &[Order::desc("created_at")];

    fn id(&self) -> BudgetId {
        self.id
    }

    fn filters() -> Vec<Filter> {
        vec![Filter::eq("is_active", true)]
    }
}

impl Entity for RecurringPayment {
    type Id = RecurringPaymentId;
    const TABLE: Table = Table::RecurringPayments;
    const ORDERING: &'static [Order] = &[Order::desc("created_at")];

    fn id(&self) -> RecurringPaymentId {
        self.id
    }
}
