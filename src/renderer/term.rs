use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use super::{format_number, gutter_width, month_row, plural_days, RenderOptions, View, CELL_WIDTH};
use crate::calendar::ContributionLevel;
use crate::layout::Layout;

const CELL_GLYPH: &str = "■ ";

/// Glyphs used per level when color is off
const PLAIN_GLYPHS: [&str; 5] = ["· ", "░ ", "▒ ", "▓ ", "█ "];

/// Dark-theme heat-map palette, least to most active
const PALETTE: [(u8, u8, u8); 5] = [
    (22, 27, 34),
    (14, 68, 41),
    (0, 109, 50),
    (38, 166, 65),
    (57, 211, 83),
];

/// Render the heat-map as terminal text.
pub fn render(view: &View, options: &RenderOptions) -> String {
    let mut output = String::new();

    if let Some(ref message) = view.error_message {
        if options.color {
            output.push_str(&format!("{}\n", message.red()));
        } else {
            output.push_str(&format!("{}\n", message));
        }
    }

    let gutter = if options.show_labels {
        gutter_width(&view.layout)
    } else {
        0
    };

    if options.show_labels {
        output.push_str(&month_row(&view.layout, gutter));
        output.push('\n');
    }

    render_grid(&mut output, &view.layout, gutter, options);

    if options.show_labels {
        output.push_str(&legend(view, options.color));
        output.push('\n');
    }

    if options.show_stats {
        output.push('\n');
        render_stats(&mut output, view);
    }

    output
}

fn cell(level: ContributionLevel, color: bool) -> String {
    if color {
        let (r, g, b) = PALETTE[level.index()];
        CELL_GLYPH.truecolor(r, g, b).to_string()
    } else {
        PLAIN_GLYPHS[level.index()].to_string()
    }
}

fn render_grid(output: &mut String, layout: &Layout, gutter: usize, options: &RenderOptions) {
    for row in 0..layout.rows() {
        let mut line = String::new();
        if gutter > 0 {
            let label = layout.day_labels.get(row).copied().flatten().unwrap_or("");
            line.push_str(label);
            line.push_str(&" ".repeat(gutter - label.width()));
        }
        for column in &layout.columns {
            match column.get(row) {
                Some(day) => line.push_str(&cell(day.level, options.color)),
                None => line.push_str(&" ".repeat(CELL_WIDTH)),
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
}

fn legend(view: &View, color: bool) -> String {
    let scale: String = ContributionLevel::ALL
        .iter()
        .map(|level| cell(*level, color))
        .collect();
    format!(
        "{} contributions in {}   Less {}More",
        format_number(view.calendar.total_contributions),
        view.window.label(),
        scale
    )
}

fn render_stats(output: &mut String, view: &View) {
    let stats = &view.stats;
    let cells = [
        (
            "Total Contributions",
            format_number(stats.total_contributions),
        ),
        ("Daily Average", stats.avg_contributions_per_day.clone()),
        ("Longest Streak", plural_days(stats.longest_streak)),
        ("Current Streak", plural_days(stats.current_streak)),
    ];

    let mut header = String::new();
    let mut values = String::new();
    for (title, value) in &cells {
        let width = title.width().max(value.width()) + 3;
        header.push_str(title);
        header.push_str(&" ".repeat(width - title.width()));
        values.push_str(value);
        values.push_str(&" ".repeat(width - value.width()));
    }
    output.push_str(header.trim_end());
    output.push('\n');
    output.push_str(values.trim_end());
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{ContributionDay, ContributionWeek, ContributionsData};
    use crate::layout::LayoutConfig;
    use crate::window::DateRange;
    use chrono::{Days, NaiveDate, TimeZone, Utc};

    fn view_for(days: u64, error: Option<&str>) -> View {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap();
        let window = DateRange::Year(2025).resolve(now).unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        let all: Vec<ContributionDay> = (0..days)
            .map(|i| {
                let mut day = ContributionDay::empty(start + Days::new(i));
                if i % 3 == 0 {
                    day.count = 2;
                    day.level = ContributionLevel::SecondQuartile;
                }
                day
            })
            .collect();
        let weeks = all
            .chunks(7)
            .map(|chunk| ContributionWeek {
                contribution_days: chunk.to_vec(),
            })
            .collect();
        let total = all.iter().map(|d| d.count as u64).sum();
        let calendar = ContributionsData::from_weeks(total, weeks).unwrap();
        View::build(
            "octocat",
            &window,
            &calendar,
            &LayoutConfig::default(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            error,
        )
        .unwrap()
    }

    #[test]
    fn test_render_with_labels() {
        let view = view_for(70, None);
        let out = render(&view, &RenderOptions::default());
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].contains("Jan"));
        assert!(lines[0].contains("Feb"));
        assert!(lines[2].starts_with("Mon"));
        assert!(out.contains("48 contributions in 2025   Less · ░ ▒ ▓ █ More"));
        assert!(!out.contains("Longest Streak"));
        // Month row, 7 grid rows, legend
        assert_eq!(lines.len(), 9);
    }

    #[test]
    fn test_render_without_labels() {
        let view = view_for(70, None);
        let options = RenderOptions {
            show_labels: false,
            ..RenderOptions::default()
        };
        let out = render(&view, &options);

        assert!(!out.contains("Jan"));
        assert!(!out.contains("Mon"));
        assert!(!out.contains("Less"));
        assert_eq!(out.lines().count(), 7);
        assert!(out.lines().all(|l| l.starts_with('▒') || l.starts_with('·')));
    }

    #[test]
    fn test_render_stats_grid() {
        let view = view_for(70, None);
        let options = RenderOptions {
            show_stats: true,
            ..RenderOptions::default()
        };
        let out = render(&view, &options);

        assert!(out.contains("Total Contributions"));
        assert!(out.contains("Current Streak"));
        assert!(out.contains("1 day"));
    }

    #[test]
    fn test_render_error_above_grid() {
        let view = view_for(14, Some("User not found"));
        let out = render(&view, &RenderOptions::default());
        assert_eq!(out.lines().next(), Some("User not found"));
    }

    #[test]
    fn test_colored_cells_use_ansi() {
        let view = view_for(14, None);
        let options = RenderOptions {
            color: true,
            ..RenderOptions::default()
        };
        let out = render(&view, &options);
        assert!(out.contains("\u{1b}[38;2;"));
        assert!(out.contains(CELL_GLYPH.trim_end()));
    }
}
