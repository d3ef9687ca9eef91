//! Notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Error,
}

/// A dashboard notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    /// Patient the notification refers to, if any
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub operation_type: Option<String>,
}

impl Notification {
    /// Create an unread notification stamped now.
    pub fn new(title: String, message: String, kind: NotificationKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            message,
            kind,
            timestamp: Utc::now(),
            read: false,
            patient_name: None,
            operation_type: None,
        }
    }

    /// Attach the patient and operation this notification is about.
    pub fn with_subject(mut self, patient_name: String, operation_type: String) -> Self {
        self.patient_name = Some(patient_name);
        self.operation_type = Some(operation_type);
        self
    }
}

/// Relative age of a timestamp, e.g. "5 minutes ago".
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else {
        format!("{} days ago", seconds / 86400)
    }
}
