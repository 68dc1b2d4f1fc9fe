//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use clarity_core::models::{
    Category, NewCategory, NewRecurringPayment, NewTransaction, TransactionType,
};
use clarity_core::period::Frequency;
use clarity_db::store::{Filter, Order, Row};
use clarity_db::{MemoryStore, RecordStore, Session, StoreError, Table};
use clarity_shared::types::{CategoryId, UserId};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, Notify, Semaphore};
use uuid::Uuid;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

/// Session over a fresh memory store, signed in as a new identity.
pub async fn signed_in() -> (Arc<MemoryStore>, Session, UserId) {
    let store = Arc::new(MemoryStore::new());
    let session = Session::new(store.clone());
    let user = UserId::new();
    session.set_identity(Some(user)).await;
    (store, session, user)
}

pub async fn create_category(session: &Session, name: &str) -> Category {
    session
        .categories()
        .create(&NewCategory::new(name))
        .await
        .unwrap()
}

pub fn expense(category_id: CategoryId, amount: Decimal, on: &str) -> NewTransaction {
    NewTransaction::new(
        category_id,
        TransactionType::Expense,
        amount,
        format!("Expense {amount}"),
        date(on),
    )
}

pub fn income(category_id: CategoryId, amount: Decimal, on: &str) -> NewTransaction {
    NewTransaction::new(
        category_id,
        TransactionType::Income,
        amount,
        format!("Income {amount}"),
        date(on),
    )
}

pub fn monthly_bill(category_id: CategoryId, name: &str, amount: Decimal, next: &str) -> NewRecurringPayment {
    NewRecurringPayment::new(
        category_id,
        name,
        TransactionType::Expense,
        amount,
        Frequency::Monthly,
        date(next),
    )
}

/// Store whose queries for one identity block until released.
pub struct GatedStore {
    inner: MemoryStore,
    gated: Mutex<Option<UserId>>,
    entered: Notify,
    release: Semaphore,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            gated: Mutex::new(None),
            entered: Notify::new(),
            release: Semaphore::new(0),
        }
    }

    /// Holds every query for `owner` until [`release`](Self::release).
    pub async fn gate(&self, owner: UserId) {
        *self.gated.lock().await = Some(owner);
    }

    /// Waits until a gated query is blocked.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Lets every held query through.
    pub async fn release(&self) {
        *self.gated.lock().await = None;
        self.release.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl RecordStore for GatedStore {
    async fn query(
        &self,
        table: Table,
        owner: UserId,
        filters: &[Filter],
        ordering: &[Order],
    ) -> Result<Vec<Row>, StoreError> {
        // Read before waiting so the released response carries the old owner's rows.
        let rows = self.inner.query(table, owner, filters, ordering).await;
        let held = *self.gated.lock().await == Some(owner);
        if held {
            self.entered.notify_one();
            let _permit = self
                .release
                .acquire()
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        rows
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, StoreError> {
        self.inner.insert(table, row).await
    }

    async fn update(
        &self,
        table: Table,
        id: Uuid,
        owner: UserId,
        patch: Row,
    ) -> Result<Row, StoreError> {
        self.inner.update(table, id, owner, patch).await
    }

    async fn delete(&self, table: Table, id: Uuid, owner: UserId) -> Result<(), StoreError> {
        self.inner.delete(table, id, owner).await
    }
}
