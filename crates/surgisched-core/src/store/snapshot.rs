//! Immutable store snapshots.

use std::sync::Arc;

use crate::models::Operation;

/// Read-only view of the store: the ordered operations plus the selection.
///
/// Cloning is cheap; the operation list is shared and is never modified
/// after the snapshot is handed out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub(crate) operations: Arc<Vec<Operation>>,
    pub(crate) selected: Option<String>,
}

impl Snapshot {
    pub(crate) fn new(operations: Vec<Operation>) -> Self {
        Self {
            operations: Arc::new(operations),
            selected: None,
        }
    }

    /// Operations in insertion order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The selected operation, if any.
    pub fn selected(&self) -> Option<&Operation> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Look up an operation by id.
    pub fn get(&self, id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.operations.iter().position(|op| op.id == id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
