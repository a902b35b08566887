//! Contribution calendar data model.
//!
//! These types mirror the shape returned by the GitHub GraphQL API so that a
//! saved snapshot and a live response deserialize into the same structs.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::window::DateWindow;

/// Quartile bucket assigned upstream to a day's activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContributionLevel {
    #[default]
    None,
    FirstQuartile,
    SecondQuartile,
    ThirdQuartile,
    FourthQuartile,
}

impl ContributionLevel {
    /// All levels from least to most active, in legend order
    pub const ALL: [ContributionLevel; 5] = [
        ContributionLevel::None,
        ContributionLevel::FirstQuartile,
        ContributionLevel::SecondQuartile,
        ContributionLevel::ThirdQuartile,
        ContributionLevel::FourthQuartile,
    ];

    /// Position in [`ContributionLevel::ALL`]
    pub fn index(self) -> usize {
        match self {
            ContributionLevel::None => 0,
            ContributionLevel::FirstQuartile => 1,
            ContributionLevel::SecondQuartile => 2,
            ContributionLevel::ThirdQuartile => 3,
            ContributionLevel::FourthQuartile => 4,
        }
    }
}

/// One day of the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    #[serde(rename = "contributionCount")]
    pub count: u32,
    #[serde(rename = "contributionLevel")]
    pub level: ContributionLevel,
}

impl ContributionDay {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            level: ContributionLevel::None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.count > 0
    }
}

/// A Sunday-first week; the first and last weeks of a calendar may be partial
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

/// A normalized contribution calendar.
///
/// Flattening `weeks` yields a contiguous, strictly increasing run of dates.
/// `first_contribution` / `last_contribution` are the earliest and latest
/// dates with a non-zero count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsData {
    pub total_contributions: u64,
    pub weeks: Vec<ContributionWeek>,
    pub first_contribution: Option<NaiveDate>,
    pub last_contribution: Option<NaiveDate>,
}

impl ContributionsData {
    /// Build a calendar from upstream weeks, deriving first/last contribution.
    ///
    /// Fails with [`Error::InvalidInput`] if the flattened days are not a
    /// contiguous, strictly increasing run of dates.
    pub fn from_weeks(total_contributions: u64, weeks: Vec<ContributionWeek>) -> Result<Self> {
        check_contiguous(&weeks)?;

        let mut active = weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
            .filter(|day| day.is_active());
        let first_contribution = active.next().map(|day| day.date);
        let last_contribution = active.last().map(|day| day.date).or(first_contribution);

        Ok(Self {
            total_contributions,
            weeks,
            first_contribution,
            last_contribution,
        })
    }

    /// All-zero calendar covering `window`.
    ///
    /// Starts on the Sunday on/before the window's first day and runs through
    /// its last day inclusive, grouped into 7-day weeks. A trailing partial week
    /// is kept.
    pub fn placeholder(window: &DateWindow) -> Self {
        let start = window.start_date();
        let end = window.end_date();
        let start_sunday = start - Days::new(u64::from(start.weekday().num_days_from_sunday()));

        let mut weeks = Vec::new();
        let mut week_days = Vec::with_capacity(7);

        for date in start_sunday.iter_days().take_while(|date| *date <= end) {
            week_days.push(ContributionDay::empty(date));
            if week_days.len() == 7 {
                weeks.push(ContributionWeek {
                    contribution_days: std::mem::replace(&mut week_days, Vec::with_capacity(7)),
                });
            }
        }

        if !week_days.is_empty() {
            weeks.push(ContributionWeek {
                contribution_days: week_days,
            });
        }

        Self {
            total_contributions: 0,
            weeks,
            first_contribution: None,
            last_contribution: None,
        }
    }

    /// Flattened days in chronological order
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> + '_ {
        self.weeks
            .iter()
            .flat_map(|week| week.contribution_days.iter())
    }

    /// Flattened days collected into a vector
    pub fn all_days(&self) -> Vec<ContributionDay> {
        self.days().copied().collect()
    }

    pub fn day_count(&self) -> usize {
        self.weeks.iter().map(|w| w.contribution_days.len()).sum()
    }
}

fn check_contiguous(weeks: &[ContributionWeek]) -> Result<()> {
    let mut previous: Option<NaiveDate> = None;
    for day in weeks.iter().flat_map(|week| week.contribution_days.iter()) {
        if let Some(prev) = previous {
            if prev.succ_opt() != Some(day.date) {
                return Err(Error::InvalidInput(format!(
                    "calendar dates are not contiguous: {} is followed by {}",
                    prev, day.date
                )));
            }
        }
        previous = Some(day.date);
    }
    Ok(())
}
