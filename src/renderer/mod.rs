//! Presentation of a computed calendar: terminal grid, Markdown report, JSON snapshot.

pub mod json;
pub mod md;
pub mod term;

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::calendar::ContributionsData;
use crate::error::Result;
use crate::layout::{Layout, LayoutConfig};
use crate::stats::{compute_stats, ContributionStats};
use crate::window::DateWindow;

/// Everything a renderer needs, computed once per calendar change
#[derive(Debug, Clone)]
pub struct View {
    pub identity: String,
    pub window: DateWindow,
    pub calendar: ContributionsData,
    pub stats: ContributionStats,
    pub layout: Layout,
    pub error_message: Option<String>,
}

impl View {
    /// Derive stats and layout from a calendar.
    pub fn build(
        identity: &str,
        window: &DateWindow,
        calendar: &ContributionsData,
        layout_config: &LayoutConfig,
        today: NaiveDate,
        error_message: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            identity: identity.to_string(),
            window: window.clone(),
            calendar: calendar.clone(),
            stats: compute_stats(calendar, today),
            layout: Layout::build(calendar, layout_config)?,
            error_message: error_message.map(str::to_string),
        })
    }
}

/// Toggles for the terminal renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_labels: bool,
    pub show_stats: bool,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_labels: true,
            show_stats: false,
            color: false,
        }
    }
}

/// Printed width of one grid cell, shared by the text renderers
pub(crate) const CELL_WIDTH: usize = 2;

/// Width of the day-label gutter, including one space of padding.
pub(crate) fn gutter_width(layout: &Layout) -> usize {
    layout
        .day_labels
        .iter()
        .flatten()
        .map(|label| label.width() + 1)
        .max()
        .unwrap_or(0)
}

/// Month labels placed over the column where each month starts.
pub(crate) fn month_row(layout: &Layout, gutter: usize) -> String {
    let mut row = " ".repeat(gutter);
    for label in &layout.month_labels {
        let target = gutter + label.column_index * CELL_WIDTH;
        let current = row.width();
        if current > gutter && current >= target {
            // Previous label ran past this column
            row.push(' ');
        } else {
            row.push_str(&" ".repeat(target - current));
        }
        row.push_str(label.month);
    }
    row.trim_end().to_string()
}

/// Format a number with thousand separators
pub(crate) fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped_rev = String::new();

    // Insert commas every three digits, starting from the right
    for (count, ch) in digits.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(ch);
    }

    grouped_rev.chars().rev().collect()
}

/// "1 day" / "3 days"
pub(crate) fn plural_days(n: usize) -> String {
    if n == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MonthLabel;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    fn label_layout(month_labels: Vec<MonthLabel>) -> Layout {
        Layout {
            columns: Vec::new(),
            month_labels,
            day_labels: vec![None, Some("Mon"), None, Some("Wed"), None, Some("Fri"), None],
        }
    }

    fn label(month: &'static str, column_index: usize) -> MonthLabel {
        MonthLabel {
            month,
            column_index,
            column_offset: 0,
        }
    }

    #[test]
    fn test_gutter_width() {
        assert_eq!(gutter_width(&label_layout(Vec::new())), 4);

        let mut layout = label_layout(Vec::new());
        layout.day_labels = vec![None; 7];
        assert_eq!(gutter_width(&layout), 0);
    }

    #[test]
    fn test_month_row_positions() {
        let layout = label_layout(vec![label("Jan", 0), label("Feb", 5)]);
        // Feb starts at gutter + 5 * CELL_WIDTH
        assert_eq!(month_row(&layout, 4), "    Jan       Feb");
    }

    #[test]
    fn test_month_row_crowded_labels() {
        let layout = label_layout(vec![label("Dec", 0), label("Jan", 1)]);
        assert_eq!(month_row(&layout, 4), "    Dec Jan");
    }

    #[test]
    fn test_plural_days() {
        assert_eq!(plural_days(1), "1 day");
        assert_eq!(plural_days(0), "0 days");
        assert_eq!(plural_days(12), "12 days");
    }
}
