/// Window module for contribution date ranges
///
/// Turns the user-facing selection (a calendar year, or a number of months back
/// from now) into the UTC bounds sent to the GraphQL API and used to synthesize
/// placeholder calendars.
use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Years accepted for a `Year` range (GitHub did not exist before 2008).
const MIN_YEAR: i32 = 2008;
const MAX_YEAR: i32 = 2100;

/// Longest `MonthsBack` window accepted.
const MAX_MONTHS_BACK: u32 = 120;

/// Requested date range, before resolution against the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    /// Calendar year, Jan 1 to Dec 31 UTC
    Year(i32),
    /// From `now - n months` to `now`
    MonthsBack(u32),
}

impl DateRange {
    /// Pick a range from optional knobs.
    ///
    /// `year` takes precedence over `months_back`; with neither, the year of
    /// `today` is used.
    pub fn from_options(year: Option<i32>, months_back: Option<u32>, today: NaiveDate) -> Self {
        match (year, months_back) {
            (Some(year), _) => DateRange::Year(year),
            (None, Some(months)) => DateRange::MonthsBack(months),
            (None, None) => DateRange::Year(today.year()),
        }
    }

    /// Reject ranges the API would not answer sensibly
    pub fn validate(&self) -> Result<()> {
        match *self {
            DateRange::Year(year) if !(MIN_YEAR..=MAX_YEAR).contains(&year) => Err(
                Error::InvalidConfig(format!(
                    "year must be between {} and {}, got {}",
                    MIN_YEAR, MAX_YEAR, year
                )),
            ),
            DateRange::MonthsBack(months) if !(1..=MAX_MONTHS_BACK).contains(&months) => {
                Err(Error::InvalidConfig(format!(
                    "months must be between 1 and {}, got {}",
                    MAX_MONTHS_BACK, months
                )))
            }
            _ => Ok(()),
        }
    }

    /// Resolve to concrete UTC bounds.
    ///
    /// - `Year(y)` → `[y-01-01T00:00:00Z, y-12-31T23:59:59Z]`
    /// - `MonthsBack(n)` → `[now - n months, now]`; the day of month is clamped
    ///   to the length of the target month (Mar 31 minus one month is Feb 28/29).
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<DateWindow> {
        self.validate()?;

        let (from, to) = match *self {
            DateRange::Year(year) => {
                let from = Utc
                    .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
                    .single()
                    .ok_or_else(|| Error::InvalidConfig(format!("Invalid year: {}", year)))?;
                let to = Utc
                    .with_ymd_and_hms(year, 12, 31, 23, 59, 59)
                    .single()
                    .ok_or_else(|| Error::InvalidConfig(format!("Invalid year: {}", year)))?;
                (from, to)
            }
            DateRange::MonthsBack(months) => {
                let from = now.checked_sub_months(Months::new(months)).ok_or_else(|| {
                    Error::InvalidConfig(format!("Cannot go back {} months from {}", months, now))
                })?;
                (from, now)
            }
        };

        Ok(DateWindow {
            range: *self,
            from,
            to,
        })
    }
}

/// A resolved date range with inclusive UTC bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub range: DateRange,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    /// First calendar day of the window (UTC)
    pub fn start_date(&self) -> NaiveDate {
        self.from.date_naive()
    }

    /// Last calendar day of the window (UTC), inclusive
    pub fn end_date(&self) -> NaiveDate {
        self.to.date_naive()
    }

    /// Human-readable label, as used in the legend ("... contributions in 2025")
    pub fn label(&self) -> String {
        match self.range {
            DateRange::Year(year) => year.to_string(),
            DateRange::MonthsBack(months) => format!("last {} months", months),
        }
    }

    /// Filename-safe key (e.g. "2025", "last-6-months")
    pub fn key(&self) -> String {
        match self.range {
            DateRange::Year(year) => year.to_string(),
            DateRange::MonthsBack(months) => format!("last-{}-months", months),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_year_takes_precedence() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            DateRange::from_options(Some(2023), Some(6), today),
            DateRange::Year(2023)
        );
        assert_eq!(
            DateRange::from_options(None, Some(6), today),
            DateRange::MonthsBack(6)
        );
        assert_eq!(
            DateRange::from_options(None, None, today),
            DateRange::Year(2025)
        );
    }

    #[test]
    fn test_resolve_year() {
        let ws = DateRange::Year(2024).resolve(at(2025, 3, 1, 12)).unwrap();
        assert_eq!(ws.from.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(ws.to.to_rfc3339(), "2024-12-31T23:59:59+00:00");
        assert_eq!(ws.start_date(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(ws.end_date(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(ws.label(), "2024");
        assert_eq!(ws.key(), "2024");
    }

    #[test]
    fn test_resolve_months_back() {
        let now = at(2025, 8, 15, 9);
        let ws = DateRange::MonthsBack(6).resolve(now).unwrap();
        assert_eq!(ws.from, at(2025, 2, 15, 9));
        assert_eq!(ws.to, now);
        assert_eq!(ws.label(), "last 6 months");
        assert_eq!(ws.key(), "last-6-months");
    }

    #[test]
    fn test_resolve_months_back_clamps_day() {
        let ws = DateRange::MonthsBack(1).resolve(at(2025, 3, 31, 0)).unwrap();
        assert_eq!(ws.start_date(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn test_resolve_months_back_across_year() {
        let ws = DateRange::MonthsBack(12).resolve(at(2025, 1, 10, 0)).unwrap();
        assert_eq!(ws.start_date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_invalid_ranges() {
        let now = at(2025, 1, 1, 0);
        assert!(matches!(
            DateRange::Year(1999).resolve(now),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            DateRange::MonthsBack(0).resolve(now),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            DateRange::MonthsBack(500).resolve(now),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_start_and_end_dates() {
        let ws = DateRange::Year(2025).resolve(at(2025, 5, 5, 0)).unwrap();
        assert_eq!(ws.start_date(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(ws.end_date(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
