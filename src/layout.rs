/// Grid layout derived from a contribution calendar.
///
/// Days are re-sliced into fixed-size columns independent of the upstream
/// week boundaries, and month labels are positioned against those columns.
/// Everything here is a pure function of its arguments.
use chrono::Datelike;
use serde::Serialize;

use crate::calendar::{ContributionDay, ContributionsData};
use crate::error::{Error, Result};

/// Default number of days stacked in one column.
pub const DEFAULT_DAYS_PER_COLUMN: usize = 7;

/// Default distance between two columns (10-unit cell + 1-unit gap).
pub const DEFAULT_COLUMN_PITCH: u32 = 11;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A chronological run of at most `days_per_column` days
pub type Column = Vec<ContributionDay>;

/// Label marking the first column of a run of same-month columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub month: &'static str,
    pub column_index: usize,
    pub column_offset: u32,
}

/// Short English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    MONTHS[(month.clamp(1, 12) - 1) as usize]
}

/// Flatten weeks and partition into consecutive chunks of `days_per_column`.
///
/// The last column may be shorter. A zero `days_per_column` is rejected.
pub fn regroup_into_columns<'a, I>(weeks: I, days_per_column: usize) -> Result<Vec<Column>>
where
    I: IntoIterator<Item = &'a crate::calendar::ContributionWeek>,
{
    if days_per_column == 0 {
        return Err(Error::InvalidConfig(
            "days per column must be at least 1".to_string(),
        ));
    }

    let all_days: Vec<ContributionDay> = weeks
        .into_iter()
        .flat_map(|week| week.contribution_days.iter().copied())
        .collect();

    Ok(all_days
        .chunks(days_per_column)
        .map(|chunk| chunk.to_vec())
        .collect())
}

/// One label per maximal run of consecutive columns starting in the same month.
///
/// Empty columns are skipped. Non-adjacent runs of the same month get their
/// own labels.
/// Offsets saturate at `u32::MAX`.
pub fn derive_month_labels(columns: &[Column], column_pitch: u32) -> Vec<MonthLabel> {
    let mut labels: Vec<MonthLabel> = Vec::new();
    let mut current_month: Option<u32> = None;

    for (column_index, column) in columns.iter().enumerate() {
        let Some(first_day) = column.first() else {
            continue;
        };
        let month = first_day.date.month();
        if current_month != Some(month) {
            labels.push(MonthLabel {
                month: month_name(month),
                column_index,
                column_offset: u32::try_from(column_index)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(column_pitch),
            });
            current_month = Some(month);
        }
    }

    labels
}

/// Row labels for the day-label gutter.
///
/// Uses the first column to decide which weekday each row holds, and labels
/// every other row (Mon/Wed/Fri for Sunday-first columns of 7).
pub fn day_labels(columns: &[Column]) -> Vec<Option<&'static str>> {
    let Some(first) = columns.first() else {
        return Vec::new();
    };

    first
        .iter()
        .enumerate()
        .map(|(row, day)| {
            if row % 2 == 1 {
                Some(weekday_name(day.date.weekday()))
            } else {
                None
            }
        })
        .collect()
}

fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "Mon",
        chrono::Weekday::Tue => "Tue",
        chrono::Weekday::Wed => "Wed",
        chrono::Weekday::Thu => "Thu",
        chrono::Weekday::Fri => "Fri",
        chrono::Weekday::Sat => "Sat",
        chrono::Weekday::Sun => "Sun",
    }
}

/// Layout knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    pub days_per_column: usize,
    pub column_pitch: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            days_per_column: DEFAULT_DAYS_PER_COLUMN,
            column_pitch: DEFAULT_COLUMN_PITCH,
        }
    }
}

/// Columns plus the labels positioned against them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub columns: Vec<Column>,
    pub month_labels: Vec<MonthLabel>,
    pub day_labels: Vec<Option<&'static str>>,
}

impl Layout {
    pub fn build(data: &ContributionsData, config: &LayoutConfig) -> Result<Self> {
        let columns = regroup_into_columns(&data.weeks, config.days_per_column)?;
        let month_labels = derive_month_labels(&columns, config.column_pitch);
        let day_labels = day_labels(&columns);
        Ok(Self {
            columns,
            month_labels,
            day_labels,
        })
    }

    /// Number of rows in the tallest column
    pub fn rows(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }
}
