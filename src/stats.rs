/// Statistics derived from a contribution calendar.
///
/// Recomputed from scratch whenever the calendar changes; nothing here is
/// cached or stateful.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{ContributionDay, ContributionsData};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionStats {
    pub total_contributions: u64,
    /// `total / day count`, always with two fractional digits ("0.00" when empty)
    pub avg_contributions_per_day: String,
    pub total_active_days: usize,
    pub longest_streak: usize,
    pub current_streak: usize,
}

/// Compute every statistic for `data`.
///
/// `today` anchors the current-streak scan; pass the current UTC date.
pub fn compute_stats(data: &ContributionsData, today: NaiveDate) -> ContributionStats {
    let days = data.all_days();

    ContributionStats {
        total_contributions: data.total_contributions,
        avg_contributions_per_day: format_average(data.total_contributions, days.len()),
        total_active_days: days.iter().filter(|day| day.is_active()).count(),
        longest_streak: longest_streak(&days),
        current_streak: current_streak(&days, today),
    }
}

fn format_average(total: u64, day_count: usize) -> String {
    if day_count == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", total as f64 / day_count as f64)
}

/// Longest run of consecutive days with a non-zero count
pub fn longest_streak(days: &[ContributionDay]) -> usize {
    let mut max = 0;
    let mut current = 0;

    for day in days {
        if day.is_active() {
            current += 1;
            max = max.max(current);
        } else {
            current = 0;
        }
    }

    max
}

/// Trailing run of active days, scanning backwards from the last day.
///
/// A zero-count day dated yesterday or earlier ends the scan. A zero-count
/// day dated today or later is not yet a confirmed absence: it is skipped and
/// the scan continues.
pub fn current_streak(days: &[ContributionDay], today: NaiveDate) -> usize {
    let yesterday = today.pred_opt().unwrap_or(today);
    let mut streak = 0;

    for day in days.iter().rev() {
        if day.is_active() {
            streak += 1;
        } else if day.date <= yesterday {
            break;
        }
    }

    streak
}
