//! Scheduled operation models.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::validation::{Candidate, ValidationResult};

/// Lifecycle status of an operation. Only changed by explicit edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl OperationStatus {
    pub const ALL: [OperationStatus; 4] = [
        OperationStatus::Scheduled,
        OperationStatus::InProgress,
        OperationStatus::Completed,
        OperationStatus::Cancelled,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            OperationStatus::Scheduled => "Scheduled",
            OperationStatus::InProgress => "In Progress",
            OperationStatus::Completed => "Completed",
            OperationStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge color used by dashboard surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            OperationStatus::Scheduled => "#3b82f6",
            OperationStatus::InProgress => "#f59e0b",
            OperationStatus::Completed => "#10b981",
            OperationStatus::Cancelled => "#ef4444",
        }
    }

    /// Whether the operation still needs attention.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            OperationStatus::Scheduled | OperationStatus::InProgress
        )
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown operation status: {}", s))
    }
}

/// Operation priority. Ordered for display: `Emergency > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Emergency,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Emergency,
    ];

    /// Display rank, higher is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Emergency => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Emergency => "Emergency",
        }
    }

    /// Badge color used by dashboard surfaces.
    pub fn color(&self) -> &'static str {
        match self {
            Priority::Emergency => "#ef4444",
            Priority::High => "#f59e0b",
            Priority::Medium => "#2563eb",
            Priority::Low => "#10b981",
        }
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|priority| priority.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown priority: {}", s))
    }
}

/// A scheduled surgical procedure.
///
/// `scheduled_date` and `scheduled_time` are kept as independent values and
/// are never folded into a single timestamp. Times are expected as
/// zero-padded 24-hour `HH:MM` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Opaque unique identifier, immutable after creation
    pub id: String,
    pub patient_name: String,
    pub patient_age: u32,
    /// Assigned doctor (not checked against the doctor list)
    pub doctor_name: String,
    /// Free-form classification (e.g., "Cardiac Surgery")
    pub operation_type: String,
    /// Assigned room (not checked against the room list)
    pub operation_room: String,
    pub scheduled_date: NaiveDate,
    /// Wall-clock start time, "HH:MM"
    pub scheduled_time: String,
    /// Duration in hours
    pub duration: f64,
    pub status: OperationStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Operation {
    /// Generate a fresh operation id.
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Check every field rule. All failing fields are reported.
    pub fn validate(&self) -> ValidationResult<()> {
        self.candidate().validate()
    }

    pub(crate) fn candidate(&self) -> Candidate<'_> {
        Candidate {
            patient_name: &self.patient_name,
            patient_age: self.patient_age,
            doctor_name: &self.doctor_name,
            operation_type: &self.operation_type,
            operation_room: &self.operation_room,
            scheduled_date: Some(self.scheduled_date),
            scheduled_time: &self.scheduled_time,
            duration: self.duration,
        }
    }

    /// Parsed start time, if the time string is well-formed.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.scheduled_time)
    }

    /// Expected end time (start plus duration), for display only.
    pub fn end_time(&self) -> Option<NaiveTime> {
        let start = self.time_of_day()?;
        let minutes = (self.duration * 60.0).round() as i64;
        Some(start + TimeDelta::try_minutes(minutes)?)
    }

    pub fn is_emergency(&self) -> bool {
        self.priority == Priority::Emergency
    }
}

/// Parse an `HH:MM` wall-clock string.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_operation() -> Operation {
        Operation {
            id: "1".into(),
            patient_name: "John Smith".into(),
            patient_age: 45,
            doctor_name: "Dr. Sarah Johnson".into(),
            operation_type: "Cardiac Surgery".into(),
            operation_room: "OR-1".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2025, 8, 13).unwrap(),
            scheduled_time: "09:00".into(),
            duration: 4.0,
            status: OperationStatus::Scheduled,
            priority: Priority::High,
            notes: Some("Patient has history of heart disease".into()),
        }
    }

    #[test]
    fn test_priority_display_order() {
        let mut priorities = vec![
            Priority::Medium,
            Priority::Emergency,
            Priority::Low,
            Priority::High,
        ];
        priorities.sort_by(|a, b| b.cmp(a));
        assert_eq!(
            priorities,
            vec![
                Priority::Emergency,
                Priority::High,
                Priority::Medium,
                Priority::Low
            ]
        );
    }

    #[test]
    fn test_status_wire_name() {
        let json = serde_json::to_string(&OperationStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: OperationStatus = serde_json::from_str("\"Cancelled\"").unwrap();
        assert_eq!(parsed, OperationStatus::Cancelled);
    }

    #[test]
    fn test_badge_colors() {
        assert_eq!(Priority::Emergency.color(), "#ef4444");
        assert_eq!(Priority::High.color(), "#f59e0b");
        assert_eq!(Priority::Medium.color(), "#2563eb");
        assert_eq!(Priority::Low.color(), "#10b981");

        assert_eq!(OperationStatus::Scheduled.color(), "#3b82f6");
        assert_eq!(OperationStatus::InProgress.color(), "#f59e0b");
        assert_eq!(OperationStatus::Completed.color(), "#10b981");
        assert_eq!(OperationStatus::Cancelled.color(), "#ef4444");
    }

    #[test]
    fn test_labels_parse_back() {
        assert_eq!("in progress".parse::<OperationStatus>(), Ok(OperationStatus::InProgress));
        assert_eq!("Emergency".parse::<Priority>(), Ok(Priority::Emergency));
        assert!("Urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_operation_json_is_camel_case() {
        let op = make_operation();
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["patientName"], "John Smith");
        assert_eq!(value["scheduledDate"], "2025-08-13");
        assert_eq!(value["status"], "Scheduled");
    }

    #[test]
    fn test_end_time() {
        let mut op = make_operation();
        assert_eq!(op.end_time(), NaiveTime::from_hms_opt(13, 0, 0));

        op.duration = 1.5;
        assert_eq!(op.end_time(), NaiveTime::from_hms_opt(10, 30, 0));

        op.scheduled_time = "morning".into();
        assert_eq!(op.end_time(), None);
    }

    #[test]
    fn test_validate_zero_age() {
        let mut op = make_operation();
        op.patient_age = 0;
        let err = op.validate().unwrap_err();
        assert!(err.has_field(crate::models::Field::PatientAge));
    }

    #[test]
    fn test_new_id_is_uuid() {
        assert_eq!(Operation::new_id().len(), 36);
    }
}
