//! Field-level validation for operations.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An operation field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    PatientName,
    PatientAge,
    DoctorName,
    OperationType,
    OperationRoom,
    ScheduledDate,
    ScheduledTime,
    Duration,
}

impl Field {
    /// Field name as shown to the form layer.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::PatientName => "patientName",
            Field::PatientAge => "patientAge",
            Field::DoctorName => "doctorName",
            Field::OperationType => "operationType",
            Field::OperationRoom => "operationRoom",
            Field::ScheduledDate => "scheduledDate",
            Field::ScheduledTime => "scheduledTime",
            Field::Duration => "duration",
        }
    }

    /// Message shown when the field's requirement is not met.
    pub fn requirement(&self) -> &'static str {
        match self {
            Field::Id => "Operation id is required",
            Field::PatientName => "Patient name is required",
            Field::PatientAge => "Valid patient age is required",
            Field::DoctorName => "Doctor selection is required",
            Field::OperationType => "Operation type is required",
            Field::OperationRoom => "Operation room is required",
            Field::ScheduledDate => "Scheduled date is required",
            Field::ScheduledTime => "Scheduled time is required",
            Field::Duration => "Valid duration is required",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single failed field with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

/// Rejection of an operation before any mutation is applied.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid operation: {}", describe(.issues))]
pub struct ValidationError {
    issues: Vec<FieldError>,
}

pub type ValidationResult<T> = Result<T, ValidationError>;

impl ValidationError {
    /// Build an error for one field with a custom reason.
    pub fn single(field: Field, reason: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldError {
                field,
                reason: reason.into(),
            }],
        }
    }

    /// All failed fields, in check order.
    pub fn issues(&self) -> &[FieldError] {
        &self.issues
    }

    /// Names of the failed fields.
    pub fn fields(&self) -> Vec<Field> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    /// Whether the given field is among the failures.
    pub fn has_field(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Reason recorded for a field, if it failed.
    pub fn reason(&self, field: Field) -> Option<&str> {
        self.issues
            .iter()
            .find(|issue| issue.field == field)
            .map(|issue| issue.reason.as_str())
    }
}

fn describe(issues: &[FieldError]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Borrowed view of the validated fields, shared by stored operations and
/// form drafts.
pub(crate) struct Candidate<'a> {
    pub patient_name: &'a str,
    pub patient_age: u32,
    pub doctor_name: &'a str,
    pub operation_type: &'a str,
    pub operation_room: &'a str,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: &'a str,
    pub duration: f64,
}

impl Candidate<'_> {
    /// Run every field check and report all failures together.
    pub(crate) fn validate(&self) -> ValidationResult<()> {
        let checks = [
            (Field::PatientName, !self.patient_name.trim().is_empty()),
            (Field::PatientAge, self.patient_age > 0),
            (Field::DoctorName, !self.doctor_name.is_empty()),
            (Field::OperationType, !self.operation_type.is_empty()),
            (Field::OperationRoom, !self.operation_room.is_empty()),
            (Field::ScheduledDate, self.scheduled_date.is_some()),
            (Field::ScheduledTime, !self.scheduled_time.is_empty()),
            // NaN fails this comparison as well
            (Field::Duration, self.duration > 0.0),
        ];

        let issues: Vec<FieldError> = checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| FieldError {
                field,
                reason: field.requirement().to_string(),
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}
