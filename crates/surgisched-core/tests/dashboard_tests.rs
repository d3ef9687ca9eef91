//! End-to-end dashboard scenarios over the seeded store.

use chrono::{NaiveDate, NaiveDateTime};
use surgisched_core::queries::{self, calendar, DashboardCounts};
use surgisched_core::{
    DashboardConfig, Field, FieldInput, FormMode, OperationForm, OperationStatus, OperationStore,
    Priority,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(day).and_hms_opt(hour, minute, 0).unwrap()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[test]
fn test_fixture_counts_on_seed_day() {
    let store = OperationStore::with_fixtures().unwrap();
    let snapshot = store.snapshot();

    assert_eq!(
        queries::counts(&snapshot, at(13, 10, 0)),
        DashboardCounts {
            total: 3,
            today: 2,
            in_progress: 1,
            emergency: 1
        }
    );
}

#[test]
fn test_fixture_dashboard_lists() {
    let store = OperationStore::with_fixtures().unwrap();
    let snapshot = store.snapshot();
    let now = at(13, 7, 30);

    let today: Vec<&str> = queries::todays_operations(&snapshot, now)
        .iter()
        .map(|op| op.patient_name.as_str())
        .collect();
    assert_eq!(today, vec!["John Smith", "Emma Wilson"]);

    let upcoming = queries::upcoming_operations(&snapshot, now, 5);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].patient_name, "Robert Davis");

    let alerts = queries::emergency_alerts(&snapshot);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].operation_type, "Neurosurgery");
}

#[test]
fn test_fixture_timeline_order() {
    let mut store = OperationStore::with_fixtures().unwrap();
    let mut form = OperationForm::open(&store, date(13));
    form.set(FieldInput::PatientName("Early Bird".into()));
    form.set(FieldInput::PatientAge(29));
    form.set(FieldInput::DoctorName("Dr. James Wilson".into()));
    form.set(FieldInput::OperationType("Biopsy".into()));
    form.set(FieldInput::OperationRoom("OR-4".into()));
    form.set(FieldInput::ScheduledTime("07:15".into()));
    let snapshot = form.submit(&mut store).unwrap();

    let order: Vec<&str> = queries::chronological(&snapshot)
        .iter()
        .map(|op| op.patient_name.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["Early Bird", "John Smith", "Emma Wilson", "Robert Davis"]
    );
}

#[test]
fn test_edit_session_through_store() {
    init_tracing();
    let mut store = OperationStore::with_fixtures().unwrap();
    let rx = store.subscribe();

    let emma = store.current().get("2").cloned().unwrap();
    store.select(Some(&emma));

    let mut form = OperationForm::open(&store, date(13));
    assert_eq!(form.mode(), &FormMode::Edit { id: "2".into() });
    form.set_status(OperationStatus::Completed);
    form.set_priority(Priority::Low);
    let snapshot = form.submit(&mut store).unwrap();

    let edited = snapshot.get("2").unwrap();
    assert_eq!(edited.status, OperationStatus::Completed);
    assert_eq!(edited.priority, Priority::Low);
    assert_eq!(snapshot.operations()[1].id, "2");
    assert_eq!(queries::counts(&snapshot, at(13, 12, 0)).in_progress, 0);

    // select, update, clear selection
    assert_eq!(rx.try_iter().count(), 3);
}

#[test]
fn test_rejected_submit_publishes_nothing() {
    let mut store = OperationStore::with_fixtures().unwrap();
    let rx = store.subscribe();
    let before = store.snapshot();

    let mut form = OperationForm::open(&store, date(13));
    form.set(FieldInput::PatientName("Walk In".into()));
    let err = form.submit(&mut store).unwrap_err();

    assert!(err.has_field(Field::PatientAge));
    assert_eq!(store.snapshot(), before);
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn test_calendar_for_seed_month() {
    let store = OperationStore::with_fixtures().unwrap();
    let snapshot = store.snapshot();
    let config = DashboardConfig::default();

    let grid = calendar::month_grid(&snapshot, date(13), date(13), &config).unwrap();
    assert_eq!(grid.cell(date(13)).unwrap().operations.len(), 2);
    assert_eq!(grid.cell(date(14)).unwrap().operations.len(), 1);

    let busy_days = grid
        .weeks
        .iter()
        .flatten()
        .filter(|cell| !cell.operations.is_empty())
        .count();
    assert_eq!(busy_days, 2);

    let next = calendar::next_month(date(13)).unwrap();
    let september = calendar::month_grid(&snapshot, next, date(13), &config).unwrap();
    assert!(september
        .weeks
        .iter()
        .flatten()
        .all(|cell| cell.operations.is_empty() || !cell.in_current_month));
}

#[test]
fn test_delete_then_patients() {
    let mut store = OperationStore::with_fixtures().unwrap();
    store.delete("1");
    store.delete("unknown");

    let snapshot = store.snapshot();
    let groups = queries::operations_by_patient(&snapshot);
    let names: Vec<&str> = groups.iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["Emma Wilson", "Robert Davis"]);
}
