//! Seed data for a fresh session.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    Doctor, Notification, NotificationKind, Operation, OperationRoom, ReferenceData,
    ValidationError,
};
use crate::notifications::NotificationInbox;
use crate::store::OperationStore;

const SEED_JSON: &str = include_str!("seed.json");

/// Fixture loading errors.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid seed operation: {0}")]
    Invalid(#[from] ValidationError),
}

/// Operations plus the reference lists they point at.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Fixtures {
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub rooms: Vec<OperationRoom>,
}

impl Fixtures {
    /// The built-in seed set.
    pub fn seed() -> Result<Self, FixtureError> {
        Self::from_json(SEED_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn reference_data(&self) -> ReferenceData {
        ReferenceData::new(self.doctors.clone(), self.rooms.clone())
    }

    /// Build a store seeded with these operations.
    pub fn into_store(self) -> Result<OperationStore, FixtureError> {
        Ok(OperationStore::new(self.operations)?)
    }
}

impl OperationStore {
    /// Store seeded with the built-in operations.
    pub fn with_fixtures() -> Result<Self, FixtureError> {
        Fixtures::seed()?.into_store()
    }
}

/// Starter notifications, stamped relative to `now`.
pub fn seed_notifications(now: DateTime<Utc>) -> NotificationInbox {
    let entry = |id: &str,
                 title: &str,
                 message: &str,
                 kind: NotificationKind,
                 age: TimeDelta,
                 read: bool,
                 subject: Option<(&str, &str)>| Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        kind,
        timestamp: now - age,
        read,
        patient_name: subject.map(|(patient, _)| patient.to_string()),
        operation_type: subject.map(|(_, op)| op.to_string()),
    };

    NotificationInbox::new(vec![
        entry(
            "1",
            "Emergency Operation Scheduled",
            "John Smith has been scheduled for emergency cardiac surgery.",
            NotificationKind::Error,
            TimeDelta::minutes(5),
            false,
            Some(("John Smith", "Cardiac Surgery")),
        ),
        entry(
            "2",
            "Operation Reminder",
            "Emma Wilson's orthopedic surgery is scheduled in 2 hours.",
            NotificationKind::Warning,
            TimeDelta::minutes(30),
            false,
            Some(("Emma Wilson", "Orthopedic Surgery")),
        ),
        entry(
            "3",
            "Operation Completed",
            "Robert Davis' neurosurgery was completed successfully.",
            NotificationKind::Success,
            TimeDelta::hours(2),
            true,
            Some(("Robert Davis", "Neurosurgery")),
        ),
        entry(
            "4",
            "New Doctor Available",
            "Dr. James Wilson is now available for consultations.",
            NotificationKind::Info,
            TimeDelta::hours(24),
            true,
            None,
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_ago;

    #[test]
    fn test_seed_parses() {
        let fixtures = Fixtures::seed().unwrap();
        assert_eq!(fixtures.operations.len(), 3);
        assert_eq!(fixtures.doctors.len(), 4);
        assert_eq!(fixtures.rooms.len(), 4);
        assert_eq!(fixtures.operations[0].duration, 4.0);
        assert_eq!(
            fixtures.operations[0].notes.as_deref(),
            Some("Patient has history of heart disease")
        );
    }

    #[test]
    fn test_seed_reference_data() {
        let reference = Fixtures::seed().unwrap().reference_data();
        assert_eq!(reference.available_doctors().count(), 3);
        assert_eq!(reference.available_rooms().count(), 3);
    }

    #[test]
    fn test_with_fixtures() {
        let store = OperationStore::with_fixtures().unwrap();
        assert_eq!(store.current().len(), 3);
        assert!(store.current().selected().is_none());
    }

    #[test]
    fn test_invalid_fixture_rejected() {
        let json = r#"{"operations":[{
            "id":"9","patientName":"","patientAge":0,"doctorName":"Dr. X",
            "operationType":"Biopsy","operationRoom":"OR-4","scheduledDate":"2025-08-13",
            "scheduledTime":"09:00","duration":1,"status":"Scheduled","priority":"Low"}]}"#;
        let err = Fixtures::from_json(json).unwrap().into_store().unwrap_err();
        assert!(matches!(err, FixtureError::Invalid(_)));
    }

    #[test]
    fn test_seed_notifications() {
        let now = Utc::now();
        let inbox = seed_notifications(now);
        assert_eq!(inbox.list().len(), 4);
        assert_eq!(inbox.unread_count(), 2);
        assert_eq!(time_ago(inbox.list()[0].timestamp, now), "5 minutes ago");
        assert_eq!(time_ago(inbox.list()[3].timestamp, now), "1 days ago");
    }
}
