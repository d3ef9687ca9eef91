//! Derived queries over store snapshots.
//!
//! Every function here is pure: it reads a [`Snapshot`] (plus a reference
//! instant where needed) and borrows from it. Dates compare at calendar-day
//! granularity in whatever local time the caller supplies as `now`.

pub mod calendar;

use std::cmp::Ordering;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::models::{parse_time_of_day, Operation, OperationStatus};
use crate::store::Snapshot;

/// Local wall-clock time, the reference instant used by dashboard surfaces.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Operations scheduled on `now`'s calendar date, in store order.
pub fn todays_operations(snapshot: &Snapshot, now: NaiveDateTime) -> Vec<&Operation> {
    operations_on_date(snapshot, now.date())
}

/// Operations on a day strictly after `now`, earliest first, at most `limit`.
///
/// Equal dates keep their store order.
pub fn upcoming_operations(
    snapshot: &Snapshot,
    now: NaiveDateTime,
    limit: usize,
) -> Vec<&Operation> {
    let today = now.date();
    let mut upcoming: Vec<&Operation> = snapshot
        .operations()
        .iter()
        .filter(|op| op.scheduled_date > today)
        .collect();
    upcoming.sort_by_key(|op| op.scheduled_date);
    upcoming.truncate(limit);
    upcoming
}

/// Operations on exactly `date`, in store order.
pub fn operations_on_date(snapshot: &Snapshot, date: NaiveDate) -> Vec<&Operation> {
    snapshot
        .operations()
        .iter()
        .filter(|op| op.scheduled_date == date)
        .collect()
}

/// All operations of one patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientGroup<'a> {
    pub name: &'a str,
    /// Age from the patient's first operation; later records that disagree
    /// are not reconciled
    pub age: u32,
    pub operations: Vec<&'a Operation>,
}

impl<'a> PatientGroup<'a> {
    /// Date of the patient's last operation in store order.
    pub fn last_scheduled(&self) -> Option<NaiveDate> {
        self.operations.last().map(|op| op.scheduled_date)
    }

    /// First `limit` operations for a summary card.
    pub fn preview(&self, limit: usize) -> &[&'a Operation] {
        &self.operations[..self.operations.len().min(limit)]
    }

    /// Operations hidden by [`preview`](Self::preview).
    pub fn overflow(&self, limit: usize) -> usize {
        self.operations.len().saturating_sub(limit)
    }
}

/// Group operations by patient name, in order of first appearance.
pub fn operations_by_patient(snapshot: &Snapshot) -> Vec<PatientGroup<'_>> {
    let mut groups: Vec<PatientGroup<'_>> = Vec::new();

    for op in snapshot.operations() {
        match groups.iter_mut().find(|g| g.name == op.patient_name) {
            Some(group) => group.operations.push(op),
            None => groups.push(PatientGroup {
                name: &op.patient_name,
                age: op.patient_age,
                operations: vec![op],
            }),
        }
    }

    groups
}

/// All operations ordered by date, then time of day. Stable.
pub fn chronological(snapshot: &Snapshot) -> Vec<&Operation> {
    let mut ordered: Vec<&Operation> = snapshot.operations().iter().collect();
    ordered.sort_by(|a, b| compare_schedule(a, b));
    ordered
}

/// Order two operations by (date, time of day).
///
/// Well-formed times compare as times; malformed ones sort after them,
/// lexicographically.
pub fn compare_schedule(a: &Operation, b: &Operation) -> Ordering {
    a.scheduled_date
        .cmp(&b.scheduled_date)
        .then_with(|| compare_times(&a.scheduled_time, &b.scheduled_time))
}

fn compare_times(a: &str, b: &str) -> Ordering {
    match (parse_time_of_day(a), parse_time_of_day(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub total: usize,
    pub today: usize,
    pub in_progress: usize,
    pub emergency: usize,
}

pub fn counts(snapshot: &Snapshot, now: NaiveDateTime) -> DashboardCounts {
    let operations = snapshot.operations();
    DashboardCounts {
        total: operations.len(),
        today: todays_operations(snapshot, now).len(),
        in_progress: operations
            .iter()
            .filter(|op| op.status == OperationStatus::InProgress)
            .count(),
        emergency: operations.iter().filter(|op| op.is_emergency()).count(),
    }
}

/// Everything the dashboard page shows at `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView<'a> {
    pub counts: DashboardCounts,
    pub todays: Vec<&'a Operation>,
    /// Bounded by `DashboardConfig::upcoming_limit`
    pub upcoming: Vec<&'a Operation>,
    pub alerts: Vec<EmergencyAlert<'a>>,
}

pub fn dashboard<'a>(
    snapshot: &'a Snapshot,
    now: NaiveDateTime,
    config: &DashboardConfig,
) -> DashboardView<'a> {
    DashboardView {
        counts: counts(snapshot, now),
        todays: todays_operations(snapshot, now),
        upcoming: upcoming_operations(snapshot, now, config.upcoming_limit),
        alerts: emergency_alerts(snapshot),
    }
}

/// Banner shown for an open emergency operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyAlert<'a> {
    pub operation_id: &'a str,
    pub patient_name: &'a str,
    pub operation_type: &'a str,
    pub time: &'a str,
    pub message: String,
}

/// Emergency-priority operations that are still scheduled or in progress.
pub fn emergency_alerts(snapshot: &Snapshot) -> Vec<EmergencyAlert<'_>> {
    snapshot
        .operations()
        .iter()
        .filter(|op| op.is_emergency() && op.status.is_active())
        .map(|op| EmergencyAlert {
            operation_id: &op.id,
            patient_name: &op.patient_name,
            operation_type: &op.operation_type,
            time: &op.scheduled_time,
            message: format!(
                "Emergency {} for {} in {} on {} at {}",
                op.operation_type.to_lowercase(),
                op.patient_name,
                op.operation_room,
                op.scheduled_date,
                op.scheduled_time
            ),
        })
        .collect()
}
