//! In-memory operation store.
//!
//! The store owns the scheduled operations and the selection pointer. It is
//! the only place state changes: every mutation is validated first, then a
//! new [`Snapshot`] is swapped in and published to subscribers. A rejected
//! mutation leaves the store untouched.
//!
//! Policies:
//! - `add` with an id that already exists is rejected on field `id`.
//! - `update` and `delete` on an unknown id are no-ops, not errors.
//! - Deleting the selected operation clears the selection.

mod snapshot;

pub use snapshot::*;

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::{Field, Operation, ValidationError, ValidationResult};

/// Owned store of scheduled operations.
#[derive(Debug, Default)]
pub struct OperationStore {
    current: Snapshot,
    subscribers: Vec<Sender<Snapshot>>,
}

impl OperationStore {
    /// Create a store seeded with an initial collection.
    ///
    /// Every seed operation is validated and ids must be unique.
    pub fn new(initial: Vec<Operation>) -> ValidationResult<Self> {
        let mut seen = HashSet::new();
        for op in &initial {
            op.validate()?;
            if !seen.insert(op.id.as_str()) {
                return Err(duplicate_id(&op.id));
            }
        }

        info!(operations = initial.len(), "operation store initialized");
        Ok(Self {
            current: Snapshot::new(initial),
            subscribers: Vec::new(),
        })
    }

    /// Create an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Current immutable view.
    pub fn snapshot(&self) -> Snapshot {
        self.current.clone()
    }

    /// Borrow the current view without cloning.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Append a new operation.
    pub fn add(&mut self, operation: Operation) -> ValidationResult<Snapshot> {
        if let Err(e) = operation.validate() {
            warn!(fields = ?e.fields(), "rejected new operation");
            return Err(e);
        }
        if self.current.contains(&operation.id) {
            warn!(id = %operation.id, "rejected operation with duplicate id");
            return Err(duplicate_id(&operation.id));
        }

        debug!(id = %operation.id, patient = %operation.patient_name, "adding operation");
        let mut next = self.current.clone();
        Arc::make_mut(&mut next.operations).push(operation);
        Ok(self.commit(next))
    }

    /// Replace the operation with the same id, keeping its position.
    ///
    /// Unknown ids leave the store unchanged and return the current view.
    pub fn update(&mut self, operation: Operation) -> ValidationResult<Snapshot> {
        if let Err(e) = operation.validate() {
            warn!(id = %operation.id, fields = ?e.fields(), "rejected operation update");
            return Err(e);
        }
        let Some(index) = self.current.position(&operation.id) else {
            debug!(id = %operation.id, "update ignored: no operation with this id");
            return Ok(self.snapshot());
        };

        debug!(id = %operation.id, "updating operation");
        let mut next = self.current.clone();
        Arc::make_mut(&mut next.operations)[index] = operation;
        Ok(self.commit(next))
    }

    /// Remove the operation with the given id, if present.
    pub fn delete(&mut self, id: &str) -> Snapshot {
        let Some(index) = self.current.position(id) else {
            debug!(id, "delete ignored: no operation with this id");
            return self.snapshot();
        };

        debug!(id, "deleting operation");
        let mut next = self.current.clone();
        Arc::make_mut(&mut next.operations).remove(index);
        if next.selected.as_deref() == Some(id) {
            next.selected = None;
        }
        self.commit(next)
    }

    /// Set or clear the selected operation.
    ///
    /// Selecting an operation that is not in the store clears the selection.
    pub fn select(&mut self, operation: Option<&Operation>) -> Snapshot {
        let mut next = self.current.clone();
        next.selected = operation
            .map(|op| op.id.as_str())
            .filter(|id| self.current.contains(id))
            .map(str::to_string);
        self.commit(next)
    }

    /// Subscribe to snapshots published after each applied mutation.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<Snapshot> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of live subscribers (as of the last publish).
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn commit(&mut self, next: Snapshot) -> Snapshot {
        self.current = next;
        self.publish();
        self.snapshot()
    }

    fn publish(&mut self) {
        let before = self.subscribers.len();
        let snapshot = &self.current;
        self.subscribers
            .retain(|tx| tx.send(snapshot.clone()).is_ok());

        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!(dropped, "pruned closed snapshot subscribers");
        }
    }
}

fn duplicate_id(id: &str) -> ValidationError {
    ValidationError::single(Field::Id, format!("Operation id already exists: {}", id))
}
