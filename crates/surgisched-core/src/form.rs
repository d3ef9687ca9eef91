//! Create/edit session for the operation form.
//!
//! The form is the single writer path into the store. It opens in create
//! mode, or in edit mode when the store has a selected operation, and either
//! submits a validated operation or is cancelled without touching the
//! operation collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{
    Candidate, Field, Operation, OperationStatus, Priority, ValidationError, ValidationResult,
};
use crate::store::{OperationStore, Snapshot};

/// Editable form contents. Zero and empty values mean "not filled in".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationDraft {
    pub patient_name: String,
    pub patient_age: u32,
    pub doctor_name: String,
    pub operation_type: String,
    pub operation_room: String,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: String,
    pub duration: f64,
    pub status: OperationStatus,
    pub priority: Priority,
    pub notes: String,
}

impl OperationDraft {
    /// Empty form for a new booking on `today`.
    pub fn blank(today: NaiveDate) -> Self {
        Self {
            patient_name: String::new(),
            patient_age: 0,
            doctor_name: String::new(),
            operation_type: String::new(),
            operation_room: String::new(),
            scheduled_date: Some(today),
            scheduled_time: String::new(),
            duration: 1.0,
            status: OperationStatus::Scheduled,
            priority: Priority::Medium,
            notes: String::new(),
        }
    }

    /// Form pre-populated from an existing operation.
    pub fn from_operation(op: &Operation) -> Self {
        Self {
            patient_name: op.patient_name.clone(),
            patient_age: op.patient_age,
            doctor_name: op.doctor_name.clone(),
            operation_type: op.operation_type.clone(),
            operation_room: op.operation_room.clone(),
            scheduled_date: Some(op.scheduled_date),
            scheduled_time: op.scheduled_time.clone(),
            duration: op.duration,
            status: op.status,
            priority: op.priority,
            notes: op.notes.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        Candidate {
            patient_name: &self.patient_name,
            patient_age: self.patient_age,
            doctor_name: &self.doctor_name,
            operation_type: &self.operation_type,
            operation_room: &self.operation_room,
            scheduled_date: self.scheduled_date,
            scheduled_time: &self.scheduled_time,
            duration: self.duration,
        }
        .validate()
    }

    /// Validate and turn the draft into an operation with the given id.
    pub fn into_operation(self, id: String) -> ValidationResult<Operation> {
        self.validate()?;
        let notes = Some(self.notes.trim().to_string()).filter(|n| !n.is_empty());

        let scheduled_date = self.scheduled_date.ok_or_else(|| {
            ValidationError::single(Field::ScheduledDate, Field::ScheduledDate.requirement())
        })?;

        Ok(Operation {
            id,
            patient_name: self.patient_name,
            patient_age: self.patient_age,
            doctor_name: self.doctor_name,
            operation_type: self.operation_type,
            operation_room: self.operation_room,
            scheduled_date,
            scheduled_time: self.scheduled_time,
            duration: self.duration,
            status: self.status,
            priority: self.priority,
            notes,
        })
    }
}

/// A new value for one validated form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    PatientName(String),
    PatientAge(u32),
    DoctorName(String),
    OperationType(String),
    OperationRoom(String),
    ScheduledDate(Option<NaiveDate>),
    ScheduledTime(String),
    Duration(f64),
}

impl FieldInput {
    /// The field this value belongs to.
    pub fn field(&self) -> Field {
        match self {
            FieldInput::PatientName(_) => Field::PatientName,
            FieldInput::PatientAge(_) => Field::PatientAge,
            FieldInput::DoctorName(_) => Field::DoctorName,
            FieldInput::OperationType(_) => Field::OperationType,
            FieldInput::OperationRoom(_) => Field::OperationRoom,
            FieldInput::ScheduledDate(_) => Field::ScheduledDate,
            FieldInput::ScheduledTime(_) => Field::ScheduledTime,
            FieldInput::Duration(_) => Field::Duration,
        }
    }

    fn apply(self, draft: &mut OperationDraft) {
        match self {
            FieldInput::PatientName(v) => draft.patient_name = v,
            FieldInput::PatientAge(v) => draft.patient_age = v,
            FieldInput::DoctorName(v) => draft.doctor_name = v,
            FieldInput::OperationType(v) => draft.operation_type = v,
            FieldInput::OperationRoom(v) => draft.operation_room = v,
            FieldInput::ScheduledDate(v) => draft.scheduled_date = v,
            FieldInput::ScheduledTime(v) => draft.scheduled_time = v,
            FieldInput::Duration(v) => draft.duration = v,
        }
    }
}

/// Whether the form creates a new operation or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// An open operation form.
#[derive(Debug, Clone)]
pub struct OperationForm {
    mode: FormMode,
    draft: OperationDraft,
    errors: BTreeMap<Field, String>,
}

impl OperationForm {
    /// Open the form against the store's current selection.
    pub fn open(store: &OperationStore, today: NaiveDate) -> Self {
        let (mode, draft) = match store.current().selected() {
            Some(op) => (
                FormMode::Edit { id: op.id.clone() },
                OperationDraft::from_operation(op),
            ),
            None => (FormMode::Create, OperationDraft::blank(today)),
        };
        debug!(?mode, "operation form opened");
        Self {
            mode,
            draft,
            errors: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Dialog heading.
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Schedule New Operation",
            FormMode::Edit { .. } => "Edit Operation",
        }
    }

    pub fn draft(&self) -> &OperationDraft {
        &self.draft
    }

    /// Errors from the last failed submit, keyed by field.
    pub fn errors(&self) -> &BTreeMap<Field, String> {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Change a field and clear its pending error.
    pub fn set(&mut self, input: FieldInput) {
        self.errors.remove(&input.field());
        input.apply(&mut self.draft);
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.draft.priority = priority;
    }

    pub fn set_status(&mut self, status: OperationStatus) {
        self.draft.status = status;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    /// Validate and write the draft to the store, then clear the selection.
    ///
    /// On failure the errors are kept on the form and the store is not
    /// touched. Editing an operation that was deleted meanwhile saves
    /// nothing.
    pub fn submit(&mut self, store: &mut OperationStore) -> ValidationResult<Snapshot> {
        let id = match &self.mode {
            FormMode::Create => Operation::new_id(),
            FormMode::Edit { id } => {
                if !store.current().contains(id) {
                    warn!(%id, "edited operation no longer exists, nothing saved");
                }
                id.clone()
            }
        };

        let result = self
            .draft
            .clone()
            .into_operation(id)
            .and_then(|op| match self.mode {
                FormMode::Create => store.add(op),
                FormMode::Edit { .. } => store.update(op),
            });

        match result {
            Ok(_) => {
                self.errors.clear();
                info!(mode = ?self.mode, "operation form submitted");
                Ok(store.select(None))
            }
            Err(e) => {
                self.errors = e
                    .issues()
                    .iter()
                    .map(|issue| (issue.field, issue.reason.clone()))
                    .collect();
                Err(e)
            }
        }
    }

    /// Abandon the form. Only the selection is cleared.
    pub fn cancel(self, store: &mut OperationStore) -> Snapshot {
        debug!(mode = ?self.mode, "operation form cancelled");
        store.select(None)
    }
}
