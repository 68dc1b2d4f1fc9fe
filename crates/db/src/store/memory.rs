//! In-memory record store.
//!
//! Behaves like the hosted store for everything the collections rely on:
//! server-generated ids and timestamps, owner scoping, ordering, and the
//! referential rules applied when a category or account is deleted. Failures
//! can be injected per operation for tests.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use clarity_shared::types::UserId;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Direction, Filter, Order, RecordStore, Row, StoreError, Table};

/// Store operation, used to target injected failures and inspect calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `query`
    Query,
    /// `insert`
    Insert,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

/// Columns the store owns; patches cannot overwrite them.
const PROTECTED_COLUMNS: [&str; 3] = ["id", "user_id", "created_at"];

#[derive(Debug, Default)]
struct State {
    tables: HashMap<Table, Vec<Row>>,
    last_timestamp: Option<DateTime<Utc>>,
    failures: HashMap<Operation, VecDeque<StoreError>>,
    calls: Vec<(Operation, Table)>,
}

impl State {
    /// Next timestamp, strictly after every one handed out before.
    fn tick(&mut self) -> Value {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + chrono::Duration::microseconds(1);
        }
        self.last_timestamp = Some(now);
        Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn begin(&mut self, operation: Operation, table: Table) -> Result<(), StoreError> {
        self.calls.push((operation, table));
        match self
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn rows(&mut self, table: Table) -> &mut Vec<Row> {
        self.tables.entry(table).or_default()
    }

    /// Sets `column` to null on `table` rows owned by `owner` that point at `id`.
    fn clear_reference(&mut self, table: Table, column: &str, id: &Value, owner: &Value) {
        for row in self.rows(table) {
            if row.get("user_id") == Some(owner) && row.get(column) == Some(id) {
                row.insert(column.to_string(), Value::Null);
            }
        }
    }
}

/// Record store held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next call of `operation` fail with `error`.
    ///
    /// Failures queue up: injecting twice fails the next two calls.
    pub async fn fail_next(&self, operation: Operation, error: StoreError) {
        self.state
            .lock()
            .await
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Every call made so far, in order.
    pub async fn calls(&self) -> Vec<(Operation, Table)> {
        self.state.lock().await.calls.clone()
    }

    /// Number of calls of `operation` made so far.
    pub async fn call_count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    /// Every row in `table`, regardless of owner, in insertion order.
    pub async fn dump(&self, table: Table) -> Vec<Row> {
        self.state
            .lock()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }
}

fn owner_value(owner: UserId) -> Value {
    Value::String(owner.to_string())
}

fn id_value(id: Uuid) -> Value {
    Value::String(id.to_string())
}

/// Orders JSON scalars: nulls first, then booleans, numbers, and strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x.to_string().cmp(&y.to_string()),
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_rows(a: &Row, b: &Row, ordering: &[Order]) -> Ordering {
    ordering
        .iter()
        .map(|order| {
            let ord = compare_values(a.get(order.column), b.get(order.column));
            match order.direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(
        &self,
        table: Table,
        owner: UserId,
        filters: &[Filter],
        ordering: &[Order],
    ) -> Result<Vec<Row>, StoreError> {
        let mut state = self.state.lock().await;
        state.begin(Operation::Query, table)?;

        let owner = owner_value(owner);
        let mut rows: Vec<Row> = state
            .rows(table)
            .iter()
            .filter(|row| row.get("user_id") == Some(&owner))
            .filter(|row| filters.iter().all(|f| f.matches(row)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| compare_rows(a, b, ordering));
        Ok(rows)
    }

    async fn insert(&self, table: Table, mut row: Row) -> Result<Row, StoreError> {
        let mut state = self.state.lock().await;
        state.begin(Operation::Insert, table)?;

        if !matches!(row.get("user_id"), Some(Value::String(_))) {
            return Err(StoreError::Server {
                status: 400,
                message: format!("null value in column \"user_id\" of relation \"{table}\""),
            });
        }

        let now = state.tick();
        row.entry("id").or_insert_with(|| id_value(Uuid::now_v7()));
        row.insert("created_at".to_string(), now.clone());
        row.insert("updated_at".to_string(), now);

        let id = row.get("id").cloned();
        let rows = state.rows(table);
        if rows.iter().any(|r| r.get("id") == id.as_ref()) {
            return Err(StoreError::Server {
                status: 409,
                message: format!("duplicate key value violates unique constraint \"{table}_pkey\""),
            });
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: Table,
        id: Uuid,
        owner: UserId,
        patch: Row,
    ) -> Result<Row, StoreError> {
        let mut state = self.state.lock().await;
        state.begin(Operation::Update, table)?;

        let now = state.tick();
        let (key, owner) = (id_value(id), owner_value(owner));
        let row = state
            .rows(table)
            .iter_mut()
            .find(|r| r.get("id") == Some(&key) && r.get("user_id") == Some(&owner))
            .ok_or(StoreError::NotFound { table, id })?;

        for (column, value) in patch {
            if !PROTECTED_COLUMNS.contains(&column.as_str()) {
                row.insert(column, value);
            }
        }
        row.insert("updated_at".to_string(), now);
        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: Uuid, owner: UserId) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.begin(Operation::Delete, table)?;

        let (id, owner) = (id_value(id), owner_value(owner));
        let rows = state.rows(table);
        let before = rows.len();
        rows.retain(|r| !(r.get("id") == Some(&id) && r.get("user_id") == Some(&owner)));
        if rows.len() == before {
            return Ok(());
        }

        match table {
            Table::Categories => {
                state.clear_reference(Table::Transactions, "category_id", &id, &owner);
                state.clear_reference(Table::RecurringPayments, "category_id", &id, &owner);
                state.rows(Table::Budgets).retain(|r| {
                    !(r.get("category_id") == Some(&id) && r.get("user_id") == Some(&owner))
                });
            }
            Table::Accounts => {
                state.clear_reference(Table::Transactions, "account_id", &id, &owner);
                state.clear_reference(Table::RecurringPayments, "account_id", &id, &owner);
            }
            Table::Transactions | Table::Budgets | Table::RecurringPayments => {}
        }
        Ok(())
    }
}
