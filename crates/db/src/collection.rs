//! Identity-scoped entity collections.
//!
//! A collection owns the snapshot of one table for the current identity. It
//! fetches when the identity changes and refetches after every successful
//! write, so the snapshot always reflects the store rather than local edits.
//!
//! State sits behind a mutex that is never held across a store call. Each
//! fetch captures the identity generation it was issued under; a response
//! arriving after the identity changed is discarded.

use std::sync::Arc;

use clarity_shared::types::UserId;
use clarity_shared::{AppError, AppResult};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::entity::Entity;
use crate::store::{RecordStore, Row, StoreError};

#[derive(Debug)]
struct State<E> {
    records: Vec<E>,
    loading: bool,
    error: Option<String>,
    identity: Option<UserId>,
    generation: u64,
}

impl<E> Default for State<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            identity: None,
            generation: 0,
        }
    }
}

/// Snapshot of one entity table for the current identity.
pub struct EntityCollection<E: Entity> {
    store: Arc<dyn RecordStore>,
    state: Mutex<State<E>>,
}

impl<E: Entity> std::fmt::Debug for EntityCollection<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCollection")
            .field("table", &E::TABLE)
            .finish_non_exhaustive()
    }
}

/// Serializes an input or patch into a store row.
pub(crate) fn to_row<T: Serialize>(value: &T) -> Result<Row, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::Decode(format!("expected an object, got {other}"))),
    }
}

fn decode<E: Entity>(row: Row) -> Result<E, StoreError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

impl<E: Entity> EntityCollection<E> {
    /// Creates an empty collection with no identity.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            state: Mutex::new(State::default()),
        }
    }

    /// Switches the identity the collection serves.
    ///
    /// A different identity empties the snapshot and, if present, fetches its
    /// records. `None` leaves the collection empty. The current identity is a no-op.
    pub async fn set_identity(&self, identity: Option<UserId>) {
        if self.assign_identity(identity).await && identity.is_some() {
            self.fetch().await;
        }
    }

    /// Switches identity and empties the snapshot without fetching.
    ///
    /// Returns false if `identity` is already current.
    pub(crate) async fn assign_identity(&self, identity: Option<UserId>) -> bool {
        let mut state = self.state.lock().await;
        if state.identity == identity {
            return false;
        }
        let generation = state.generation + 1;
        *state = State {
            identity,
            generation,
            ..State::default()
        };
        true
    }

    /// Replaces the snapshot with the current identity's records.
    ///
    /// Failures are recorded in [`error`](Self::error) and leave the previous
    /// records in place. Without an identity nothing happens.
    pub async fn fetch(&self) {
        let (owner, generation) = {
            let mut state = self.state.lock().await;
            let Some(owner) = state.identity else {
                return;
            };
            state.loading = true;
            (owner, state.generation)
        };

        debug!(table = %E::TABLE, "Fetching collection");
        let result = self
            .store
            .query(E::TABLE, owner, &E::filters(), E::ORDERING)
            .await
            .and_then(|rows| rows.into_iter().map(decode::<E>).collect::<Result<Vec<_>, _>>());

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!(table = %E::TABLE, "Discarding stale fetch response");
            return;
        }
        state.loading = false;
        match result {
            Ok(records) => {
                debug!(table = %E::TABLE, count = records.len(), "Collection fetched");
                state.records = records;
                state.error = None;
            }
            Err(e) => {
                warn!(table = %E::TABLE, error = %e, "Failed to fetch collection");
                state.error = Some(e.to_string());
            }
        }
    }

    /// Same as [`fetch`](Self::fetch); for callers retrying after an error.
    pub async fn refetch(&self) {
        self.fetch().await;
    }

    /// Current snapshot, in fetch order.
    pub async fn records(&self) -> Vec<E> {
        self.state.lock().await.records.clone()
    }

    /// Returns true while a fetch is in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Message of the last failed fetch, cleared by the next successful one.
    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    /// Identity the collection serves.
    pub async fn identity(&self) -> Option<UserId> {
        self.state.lock().await.identity
    }

    /// Record with `id` in the current snapshot.
    pub async fn find(&self, id: E::Id) -> Option<E> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    async fn owner(&self) -> AppResult<UserId> {
        self.state
            .lock()
            .await
            .identity
            .ok_or_else(|| AppError::Unauthenticated(format!("No identity to write {}", E::TABLE)))
    }

    /// Writes a new record owned by the current identity, then refetches.
    ///
    /// `input` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns an error without refetching if there is no identity or the write fails.
    pub async fn insert<I: Serialize + Sync>(&self, input: &I) -> AppResult<E> {
        let owner = self.owner().await?;
        let mut row = to_row(input)?;
        row.insert("user_id".to_string(), Value::String(owner.to_string()));

        let created = match self.store.insert(E::TABLE, row).await.and_then(decode::<E>) {
            Ok(created) => created,
            Err(e) => {
                warn!(table = %E::TABLE, error = %e, "Failed to create record");
                return Err(e.into());
            }
        };
        debug!(table = %E::TABLE, id = %created.id(), "Record created");

        self.fetch().await;
        Ok(created)
    }

    /// Applies a sparse patch to the record with `id`, then refetches.
    ///
    /// `patch` must already be validated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the current identity owns no such
    /// record; any failure skips the refetch.
    pub async fn patch<P: Serialize + Sync>(&self, id: E::Id, patch: &P) -> AppResult<E> {
        let owner = self.owner().await?;
        let row = to_row(patch)?;

        let updated = match self
            .store
            .update(E::TABLE, id.into(), owner, row)
            .await
            .and_then(decode::<E>)
        {
            Ok(updated) => updated,
            Err(e) => {
                warn!(table = %E::TABLE, id = %id, error = %e, "Failed to update record");
                return Err(e.into());
            }
        };
        debug!(table = %E::TABLE, id = %id, "Record updated");

        self.fetch().await;
        Ok(updated)
    }

    /// Deletes the record with `id`, then refetches.
    ///
    /// Deleting a record the identity does not own changes nothing and succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error without refetching if there is no identity or the delete fails.
    pub async fn remove(&self, id: E::Id) -> AppResult<()> {
        let owner = self.owner().await?;

        if let Err(e) = self.store.delete(E::TABLE, id.into(), owner).await {
            warn!(table = %E::TABLE, id = %id, error = %e, "Failed to delete record");
            return Err(e.into());
        }
        debug!(table = %E::TABLE, id = %id, "Record deleted");

        self.fetch().await;
        Ok(())
    }
}
