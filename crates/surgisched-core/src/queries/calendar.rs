//! Month grid for the calendar view.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;

use super::operations_on_date;
use crate::config::{DashboardConfig, WeekStart};
use crate::models::Operation;
use crate::store::Snapshot;

/// One day cell in the month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for the leading/trailing days of neighbouring months
    pub in_current_month: bool,
    pub is_today: bool,
    pub operations: Vec<&'a Operation>,
    #[serde(skip)]
    preview_limit: usize,
}

impl<'a> DayCell<'a> {
    /// Operations shown inside the cell.
    pub fn preview(&self) -> &[&'a Operation] {
        &self.operations[..self.operations.len().min(self.preview_limit)]
    }

    /// Count for the "+N more" marker.
    pub fn overflow(&self) -> usize {
        self.operations.len().saturating_sub(self.preview_limit)
    }
}

/// A month laid out as whole weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid<'a> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<DayCell<'a>>>,
}

impl<'a> MonthGrid<'a> {
    /// Title such as "August 2025".
    pub fn title(&self) -> String {
        self.first_of_month()
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    pub fn first_of_month(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&DayCell<'a>> {
        self.weeks.iter().flatten().find(|cell| cell.date == date)
    }
}

/// Lay out the month containing `anchor`.
///
/// The grid runs from the start of the week holding the 1st to the end of
/// the week holding the last day, so every row has seven cells. Returns
/// `None` when that range leaves chrono's supported dates.
pub fn month_grid<'a>(
    snapshot: &'a Snapshot,
    anchor: NaiveDate,
    today: NaiveDate,
    config: &DashboardConfig,
) -> Option<MonthGrid<'a>> {
    let month_start = anchor.checked_sub_days(Days::new(u64::from(anchor.day0())))?;
    let month_end = month_start
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))?;
    let grid_start = start_of_week(month_start, config.week_start)?;
    let grid_end = start_of_week(month_end, config.week_start)?.checked_add_days(Days::new(6))?;

    let mut weeks = Vec::new();
    let mut row = Vec::with_capacity(7);
    for date in grid_start.iter_days().take_while(|d| *d <= grid_end) {
        row.push(DayCell {
            date,
            in_current_month: date.month() == month_start.month(),
            is_today: date == today,
            operations: operations_on_date(snapshot, date),
            preview_limit: config.calendar_preview_limit,
        });
        if row.len() == 7 {
            weeks.push(std::mem::replace(&mut row, Vec::with_capacity(7)));
        }
    }

    Some(MonthGrid {
        year: month_start.year(),
        month: month_start.month(),
        weeks,
    })
}

/// Same day in the following month (clamped to month length).
pub fn next_month(anchor: NaiveDate) -> Option<NaiveDate> {
    anchor.checked_add_months(Months::new(1))
}

/// Same day in the previous month (clamped to month length).
pub fn prev_month(anchor: NaiveDate) -> Option<NaiveDate> {
    anchor.checked_sub_months(Months::new(1))
}

fn start_of_week(date: NaiveDate, week_start: WeekStart) -> Option<NaiveDate> {
    let offset = match week_start {
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
        WeekStart::Monday => date.weekday().num_days_from_monday(),
    };
    date.checked_sub_days(Days::new(u64::from(offset)))
}
