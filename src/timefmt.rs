use chrono::NaiveDate;

use crate::calendar::ContributionsData;

/// Format a date as "Jan 5, 2025".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Describe the span between the first and last active day, or '-' with no activity.
pub fn format_first_last(data: &ContributionsData) -> String {
    match (data.first_contribution, data.last_contribution) {
        (Some(first), Some(last)) if first == last => format_date(first),
        (Some(first), Some(last)) => format!("{} to {}", format_date(first), format_date(last)),
        _ => "-".to_string(),
    }
}
