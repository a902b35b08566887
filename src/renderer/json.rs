use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::View;
use crate::calendar::ContributionsData;
use crate::error::Result;
use crate::layout::LayoutConfig;
use crate::stats::ContributionStats;
use crate::window::DateWindow;

/// A calendar saved alongside its stats, re-renderable offline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub identity: String,
    pub window: DateWindow,
    pub calendar: ContributionsData,
    pub stats: ContributionStats,
    pub generated_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn from_view(view: &View, generated_at: DateTime<Utc>) -> Self {
        Self {
            identity: view.identity.clone(),
            window: view.window.clone(),
            calendar: view.calendar.clone(),
            stats: view.stats.clone(),
            generated_at,
        }
    }

    /// Load a snapshot from a JSON file.
    ///
    /// The calendar is rebuilt through [`ContributionsData::from_weeks`], so a
    /// file with out-of-order or missing days fails with
    /// [`crate::error::Error::InvalidInput`] and first/last contribution are re-derived
    /// rather than trusted.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut snapshot: Self = serde_json::from_str(&contents)?;
        let ContributionsData {
            total_contributions,
            weeks,
            ..
        } = snapshot.calendar;
        snapshot.calendar = ContributionsData::from_weeks(total_contributions, weeks)?;
        Ok(snapshot)
    }

    /// Rebuild a view; layout and stats are recomputed for `today`.
    pub fn to_view(&self, layout_config: &LayoutConfig, today: NaiveDate) -> Result<View> {
        View::build(
            &self.identity,
            &self.window,
            &self.calendar,
            layout_config,
            today,
            None,
        )
    }
}

/// Render a view as a pretty-printed snapshot
pub fn render(view: &View, generated_at: DateTime<Utc>) -> Result<String> {
    let snapshot = Snapshot::from_view(view, generated_at);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{ContributionDay, ContributionLevel, ContributionWeek};
    use crate::error::Error;
    use crate::window::DateRange;
    use chrono::{Days, TimeZone};
    use tempfile::TempDir;

    fn sample_view() -> View {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let window = DateRange::MonthsBack(1).resolve(now).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        let days: Vec<ContributionDay> = (0..14)
            .map(|i| ContributionDay {
                date: start + Days::new(i),
                count: (i % 2) as u32,
                level: if i % 2 == 1 {
                    ContributionLevel::FirstQuartile
                } else {
                    ContributionLevel::None
                },
            })
            .collect();
        let weeks = days
            .chunks(7)
            .map(|c| ContributionWeek {
                contribution_days: c.to_vec(),
            })
            .collect();
        let calendar = ContributionsData::from_weeks(7, weeks).unwrap();
        View::build(
            "octocat",
            &window,
            &calendar,
            &LayoutConfig::default(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_round_trip_through_file() {
        let view = sample_view();
        let generated_at = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let json = render(&view, generated_at).unwrap();

        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"contributionCount\""));
        assert!(json.contains("\"FIRST_QUARTILE\""));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, &json).unwrap();

        let loaded = Snapshot::load_from_file(&path).unwrap();
        assert_eq!(loaded, Snapshot::from_view(&view, generated_at));

        let rebuilt = loaded
            .to_view(&LayoutConfig::default(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
            .unwrap();
        assert_eq!(rebuilt.stats, view.stats);
        assert_eq!(rebuilt.layout, view.layout);
    }

    #[test]
    fn test_load_rejects_gapped_calendar() {
        let view = sample_view();
        let mut snapshot = Snapshot::from_view(&view, Utc::now());
        // Drop a day from the middle of the first week
        snapshot.calendar.weeks[0].contribution_days.remove(3);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gapped.json");
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        assert!(matches!(
            Snapshot::load_from_file(&path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_rederives_first_and_last() {
        let view = sample_view();
        let mut snapshot = Snapshot::from_view(&view, Utc::now());
        snapshot.calendar.first_contribution = None;
        snapshot.calendar.last_contribution = NaiveDate::from_ymd_opt(2030, 1, 1);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tampered.json");
        fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let loaded = Snapshot::load_from_file(&path).unwrap();
        assert_eq!(loaded.calendar.first_contribution, NaiveDate::from_ymd_opt(2025, 2, 3));
        assert_eq!(loaded.calendar.last_contribution, NaiveDate::from_ymd_opt(2025, 2, 15));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(Snapshot::load_from_file(&dir.path().join("missing.json")).is_err());
    }
}
