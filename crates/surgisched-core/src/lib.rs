//! Surgisched Core Library
//!
//! In-memory scheduling core for a hospital operating-theatre dashboard.
//!
//! # Architecture
//!
//! ```text
//!   Seed fixtures ──► OperationStore ◄── OperationForm (create / edit / cancel)
//!                          │
//!                     Snapshot (immutable, published to subscribers)
//!                          │
//!        ┌─────────────┬───┴──────────┬──────────────┬─────────────┐
//!        ▼             ▼              ▼              ▼             ▼
//!    Dashboard     Calendar       Timeline       Patients      Alerts
//!   (today/next/   (month grid)  (chronological) (by patient)  (emergency)
//!    counts)
//! ```
//!
//! # Core Principle
//!
//! **The store is the only place state changes.** Every mutation is
//! validated before it is applied; a rejected mutation leaves the store
//! exactly as it was. Readers only ever see whole snapshots.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Operation, Doctor, OperationRoom, Notification)
//! - [`store`]: Operation store and snapshots
//! - [`queries`]: Derived views (today, upcoming, calendar, timeline, counts)
//! - [`form`]: Create/edit form session
//! - [`notifications`]: Notification inbox
//! - [`fixtures`]: Seed data
//! - [`config`]: Dashboard configuration and user settings

pub mod config;
pub mod fixtures;
pub mod form;
pub mod models;
pub mod notifications;
pub mod queries;
pub mod store;

// Re-export commonly used types
pub use config::{DashboardConfig, UserSettings};
pub use fixtures::Fixtures;
pub use form::{FieldInput, FormMode, OperationDraft, OperationForm};
pub use models::{
    Doctor, Field, Notification, Operation, OperationRoom, OperationStatus, Priority,
    ReferenceData, ValidationError,
};
pub use notifications::NotificationInbox;
pub use queries::DashboardCounts;
pub use store::{OperationStore, Snapshot};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SurgischedError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for SurgischedError {
    fn from(e: ValidationError) -> Self {
        SurgischedError::Validation(e.to_string())
    }
}

impl From<fixtures::FixtureError> for SurgischedError {
    fn from(e: fixtures::FixtureError) -> Self {
        SurgischedError::Fixture(e.to_string())
    }
}

impl From<config::ConfigError> for SurgischedError {
    fn from(e: config::ConfigError) -> Self {
        SurgischedError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for SurgischedError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        SurgischedError::Internal(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open an empty scheduler.
#[uniffi::export]
pub fn open_scheduler() -> Arc<SchedulerCore> {
    Arc::new(SchedulerCore::from_store(OperationStore::empty()))
}

/// Open a scheduler seeded with the built-in operations.
#[uniffi::export]
pub fn open_scheduler_with_fixtures() -> Result<Arc<SchedulerCore>, SurgischedError> {
    let store = OperationStore::with_fixtures()?;
    Ok(Arc::new(SchedulerCore::from_store(store)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct SchedulerCore {
    store: Arc<Mutex<OperationStore>>,
    config: Mutex<DashboardConfig>,
}

impl SchedulerCore {
    fn from_store(store: OperationStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Mutex::new(DashboardConfig::default()),
        }
    }

    fn snapshot(&self) -> Result<Snapshot, SurgischedError> {
        Ok(self.store.lock()?.snapshot())
    }

    fn config(&self) -> Result<DashboardConfig, SurgischedError> {
        Ok(self.config.lock()?.clone())
    }
}

#[uniffi::export]
impl SchedulerCore {
    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the dashboard configuration from JSON. Missing keys take
    /// their defaults.
    pub fn configure(&self, config_json: String) -> Result<(), SurgischedError> {
        let config = DashboardConfig::from_json(&config_json)?;
        *self.config.lock()? = config;
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a new operation. An empty id gets a generated one.
    pub fn add_operation(&self, operation: FfiOperation) -> Result<FfiOperation, SurgischedError> {
        let mut operation = Operation::try_from(operation)?;
        if operation.id.is_empty() {
            operation.id = Operation::new_id();
        }
        self.store.lock()?.add(operation.clone())?;
        Ok(operation.into())
    }

    /// Replace an existing operation. Unknown ids are ignored.
    pub fn update_operation(&self, operation: FfiOperation) -> Result<(), SurgischedError> {
        let operation = Operation::try_from(operation)?;
        self.store.lock()?.update(operation)?;
        Ok(())
    }

    /// Delete an operation. Unknown ids are ignored.
    pub fn delete_operation(&self, id: String) -> Result<(), SurgischedError> {
        self.store.lock()?.delete(&id);
        Ok(())
    }

    /// Select an operation for editing, or clear the selection with `None`.
    pub fn select_operation(&self, id: Option<String>) -> Result<(), SurgischedError> {
        let mut store = self.store.lock()?;
        let selected = id.and_then(|id| store.current().get(&id).cloned());
        store.select(selected.as_ref());
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn list_operations(&self) -> Result<Vec<FfiOperation>, SurgischedError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.operations().iter().map(FfiOperation::from).collect())
    }

    pub fn selected_operation(&self) -> Result<Option<FfiOperation>, SurgischedError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.selected().map(FfiOperation::from))
    }

    /// Operations on the day of `today` (`YYYY-MM-DD`).
    pub fn todays_operations(&self, today: String) -> Result<Vec<FfiOperation>, SurgischedError> {
        let now = start_of_day(&today)?;
        let snapshot = self.snapshot()?;
        Ok(queries::todays_operations(&snapshot, now)
            .into_iter()
            .map(FfiOperation::from)
            .collect())
    }

    /// Operations after `today`, earliest first. Without `limit` the
    /// configured upcoming limit applies.
    pub fn upcoming_operations(
        &self,
        today: String,
        limit: Option<u32>,
    ) -> Result<Vec<FfiOperation>, SurgischedError> {
        let now = start_of_day(&today)?;
        let limit = match limit {
            Some(limit) => limit as usize,
            None => self.config()?.upcoming_limit,
        };
        let snapshot = self.snapshot()?;
        Ok(queries::upcoming_operations(&snapshot, now, limit)
            .into_iter()
            .map(FfiOperation::from)
            .collect())
    }

    /// All operations in timeline order.
    pub fn timeline(&self) -> Result<Vec<FfiOperation>, SurgischedError> {
        let snapshot = self.snapshot()?;
        Ok(queries::chronological(&snapshot)
            .into_iter()
            .map(FfiOperation::from)
            .collect())
    }

    pub fn counts(&self, today: String) -> Result<FfiDashboardCounts, SurgischedError> {
        let now = start_of_day(&today)?;
        let snapshot = self.snapshot()?;
        Ok(queries::counts(&snapshot, now).into())
    }

    /// Counts, today's list, upcoming list and emergency alerts for `today`.
    pub fn dashboard(&self, today: String) -> Result<FfiDashboard, SurgischedError> {
        let now = start_of_day(&today)?;
        let config = self.config()?;
        let snapshot = self.snapshot()?;
        let view = queries::dashboard(&snapshot, now, &config);
        Ok(FfiDashboard {
            counts: view.counts.into(),
            todays: view.todays.into_iter().map(FfiOperation::from).collect(),
            upcoming: view.upcoming.into_iter().map(FfiOperation::from).collect(),
            alerts: view.alerts.into_iter().map(|alert| alert.message).collect(),
        })
    }

    /// Patient cards; `preview` holds the configured number of operations.
    pub fn patients(&self) -> Result<Vec<FfiPatientGroup>, SurgischedError> {
        let limit = self.config()?.patient_preview_limit;
        let snapshot = self.snapshot()?;
        Ok(queries::operations_by_patient(&snapshot)
            .into_iter()
            .map(|group| FfiPatientGroup {
                name: group.name.to_string(),
                age: group.age,
                preview: group.preview(limit).iter().copied().map(FfiOperation::from).collect(),
                overflow: group.overflow(limit) as u32,
                operations: group.operations.into_iter().map(FfiOperation::from).collect(),
            })
            .collect())
    }
}

fn start_of_day(raw: &str) -> Result<NaiveDateTime, SurgischedError> {
    parse_date(raw)?
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| SurgischedError::InvalidInput(format!("Invalid date '{}'", raw)))
}

fn parse_date(raw: &str) -> Result<NaiveDate, SurgischedError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| SurgischedError::InvalidInput(format!("Invalid date '{}': {}", raw, e)))
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe operation. Dates are `YYYY-MM-DD`; status and priority use
/// their display labels.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOperation {
    pub id: String,
    pub patient_name: String,
    pub patient_age: u32,
    pub doctor_name: String,
    pub operation_type: String,
    pub operation_room: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub duration: f64,
    pub status: String,
    pub priority: String,
    pub notes: Option<String>,
}

impl From<&Operation> for FfiOperation {
    fn from(op: &Operation) -> Self {
        Self {
            id: op.id.clone(),
            patient_name: op.patient_name.clone(),
            patient_age: op.patient_age,
            doctor_name: op.doctor_name.clone(),
            operation_type: op.operation_type.clone(),
            operation_room: op.operation_room.clone(),
            scheduled_date: op.scheduled_date.format("%Y-%m-%d").to_string(),
            scheduled_time: op.scheduled_time.clone(),
            duration: op.duration,
            status: op.status.label().to_string(),
            priority: op.priority.label().to_string(),
            notes: op.notes.clone(),
        }
    }
}

impl From<Operation> for FfiOperation {
    fn from(op: Operation) -> Self {
        FfiOperation::from(&op)
    }
}

impl TryFrom<FfiOperation> for Operation {
    type Error = SurgischedError;

    fn try_from(op: FfiOperation) -> Result<Self, Self::Error> {
        Ok(Operation {
            id: op.id,
            patient_name: op.patient_name,
            patient_age: op.patient_age,
            doctor_name: op.doctor_name,
            operation_type: op.operation_type,
            operation_room: op.operation_room,
            scheduled_date: parse_date(&op.scheduled_date)?,
            scheduled_time: op.scheduled_time,
            duration: op.duration,
            status: op.status.parse().map_err(SurgischedError::InvalidInput)?,
            priority: op.priority.parse().map_err(SurgischedError::InvalidInput)?,
            notes: op.notes,
        })
    }
}

/// FFI-safe dashboard counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardCounts {
    pub total: u32,
    pub today: u32,
    pub in_progress: u32,
    pub emergency: u32,
}

impl From<DashboardCounts> for FfiDashboardCounts {
    fn from(counts: DashboardCounts) -> Self {
        Self {
            total: counts.total as u32,
            today: counts.today as u32,
            in_progress: counts.in_progress as u32,
            emergency: counts.emergency as u32,
        }
    }
}

/// FFI-safe dashboard page.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboard {
    pub counts: FfiDashboardCounts,
    pub todays: Vec<FfiOperation>,
    pub upcoming: Vec<FfiOperation>,
    pub alerts: Vec<String>,
}

/// FFI-safe patient grouping.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientGroup {
    pub name: String,
    pub age: u32,
    pub preview: Vec<FfiOperation>,
    /// Operations beyond the preview
    pub overflow: u32,
    pub operations: Vec<FfiOperation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ffi_operation(id: &str) -> FfiOperation {
        FfiOperation {
            id: id.into(),
            patient_name: "Olivia Brown".into(),
            patient_age: 61,
            doctor_name: "Dr. James Wilson".into(),
            operation_type: "Appendectomy".into(),
            operation_room: "OR-4".into(),
            scheduled_date: "2025-08-15".into(),
            scheduled_time: "10:30".into(),
            duration: 1.5,
            status: "Scheduled".into(),
            priority: "Low".into(),
            notes: None,
        }
    }

    #[test]
    fn test_fixture_counts_via_ffi() {
        let core = open_scheduler_with_fixtures().unwrap();
        let counts = core.counts("2025-08-13".into()).unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.today, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.emergency, 1);
    }

    #[test]
    fn test_add_generates_id() {
        let core = open_scheduler();
        let added = core.add_operation(ffi_operation("")).unwrap();
        assert_eq!(added.id.len(), 36);
        assert_eq!(core.list_operations().unwrap().len(), 1);
    }

    #[test]
    fn test_add_invalid_status_rejected() {
        let core = open_scheduler();
        let mut op = ffi_operation("a");
        op.status = "Postponed".into();
        let err = core.add_operation(op).unwrap_err();
        assert!(matches!(err, SurgischedError::InvalidInput(_)));
        assert!(core.list_operations().unwrap().is_empty());
    }

    #[test]
    fn test_add_zero_age_is_validation_error() {
        let core = open_scheduler();
        let mut op = ffi_operation("a");
        op.patient_age = 0;
        let err = core.add_operation(op).unwrap_err();
        assert!(matches!(err, SurgischedError::Validation(msg) if msg.contains("patientAge")));
    }

    #[test]
    fn test_select_update_delete() {
        let core = open_scheduler();
        core.add_operation(ffi_operation("a")).unwrap();

        core.select_operation(Some("a".into())).unwrap();
        assert_eq!(core.selected_operation().unwrap().map(|o| o.id), Some("a".to_string()));

        let mut edited = ffi_operation("a");
        edited.status = "In Progress".into();
        core.update_operation(edited).unwrap();
        assert_eq!(core.list_operations().unwrap()[0].status, "In Progress");

        core.delete_operation("a".into()).unwrap();
        assert!(core.list_operations().unwrap().is_empty());
        assert!(core.selected_operation().unwrap().is_none());
    }

    #[test]
    fn test_bad_date_rejected() {
        let core = open_scheduler();
        assert!(matches!(
            core.counts("13/08/2025".into()),
            Err(SurgischedError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_timeline_and_patients() {
        let core = open_scheduler_with_fixtures().unwrap();
        let timeline: Vec<String> = core.timeline().unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(timeline, vec!["1", "2", "3"]);

        let patients = core.patients().unwrap();
        assert_eq!(patients.len(), 3);
        assert_eq!(patients[2].name, "Robert Davis");

        let upcoming = core.upcoming_operations("2025-08-13".into(), Some(5)).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].priority, "Emergency");
    }

    #[test]
    fn test_configured_limits_apply() {
        let core = open_scheduler();
        for (i, day) in ["2025-08-14", "2025-08-15", "2025-08-16", "2025-08-17"].iter().enumerate() {
            let mut op = ffi_operation(&format!("op-{}", i));
            op.scheduled_date = day.to_string();
            core.add_operation(op).unwrap();
        }

        assert_eq!(core.upcoming_operations("2025-08-13".into(), None).unwrap().len(), 4);
        assert_eq!(core.patients().unwrap()[0].preview.len(), 3);
        assert_eq!(core.patients().unwrap()[0].overflow, 1);

        core.configure(r#"{"upcomingLimit": 2, "patientPreviewLimit": 1}"#.into())
            .unwrap();
        let upcoming = core.upcoming_operations("2025-08-13".into(), None).unwrap();
        let ids: Vec<String> = upcoming.into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["op-0", "op-1"]);
        assert_eq!(core.dashboard("2025-08-13".into()).unwrap().upcoming.len(), 2);
        assert_eq!(core.upcoming_operations("2025-08-13".into(), Some(3)).unwrap().len(), 3);

        let patients = core.patients().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].preview.len(), 1);
        assert_eq!(patients[0].overflow, 3);
        assert_eq!(patients[0].operations.len(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let core = open_scheduler();
        let err = core.configure(r#"{"upcomingLimit": 0}"#.into()).unwrap_err();
        assert!(matches!(err, SurgischedError::InvalidInput(_)));
        assert_eq!(core.config().unwrap(), DashboardConfig::default());
    }
}
