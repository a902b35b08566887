use super::{format_number, gutter_width, month_row, plural_days, View, CELL_WIDTH};
use crate::layout::Layout;
use crate::timefmt::{format_date, format_first_last};
use anyhow::Result;
use unicode_width::UnicodeWidthStr;

/// Single-hue shade ramp, least to most active, one cell wide each
const LEVEL_SHADES: [&str; 5] = ["··", "░░", "▒▒", "▓▓", "██"];

/// Render a calendar view to Markdown
pub fn render(view: &View) -> Result<String> {
    let mut output = String::new();

    // 1. Title and window
    render_header(&mut output, view);

    // 2. Summary
    render_summary(&mut output, view);

    // 3. Heat-map
    render_heatmap(&mut output, &view.layout);

    // 4. Legend
    render_legend(&mut output, view);

    Ok(output)
}

fn render_header(output: &mut String, view: &View) {
    output.push_str(&format!(
        "# 🟩 GitHub contributions: {} ({})\n",
        view.identity,
        view.window.label()
    ));

    let profile = format!("https://github.com/{}", view.identity);
    output.push_str(&format!("- **User:** [{}]({})\n", view.identity, profile));
    output.push_str(&format!(
        "- **Window:** {} to {}\n",
        format_date(view.window.start_date()),
        format_date(view.window.end_date())
    ));
    output.push_str(&format!(
        "- **Active span:** {}\n",
        format_first_last(&view.calendar)
    ));

    if let Some(ref message) = view.error_message {
        output.push_str(&format!("\n> ⚠️ {}\n", message));
    }
    output.push('\n');
}

fn render_summary(output: &mut String, view: &View) {
    let stats = &view.stats;
    output.push_str("### 📊 Summary\n");
    output.push_str("| Total Contributions | Daily Average | Longest Streak | Current Streak |\n");
    output.push_str("|---:|---:|---:|---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n",
        format_number(stats.total_contributions),
        stats.avg_contributions_per_day,
        plural_days(stats.longest_streak),
        plural_days(stats.current_streak)
    ));
    output.push_str(&format!(
        "\n- 🔥 **Active days:** {}\n\n",
        format_number(stats.total_active_days as u64)
    ));
}

fn render_heatmap(output: &mut String, layout: &Layout) {
    output.push_str("### 🗓️ Calendar\n");
    output.push_str("```text\n");

    let gutter = gutter_width(layout);
    output.push_str(&month_row(layout, gutter));
    output.push('\n');

    for row in 0..layout.rows() {
        let label = layout.day_labels.get(row).copied().flatten().unwrap_or("");
        let mut line = format!("{}{}", label, " ".repeat(gutter - label.width()));
        for column in &layout.columns {
            match column.get(row) {
                Some(day) => line.push_str(LEVEL_SHADES[day.level.index()]),
                None => line.push_str(&" ".repeat(CELL_WIDTH)),
            }
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }

    output.push_str("```\n\n");
}

fn render_legend(output: &mut String, view: &View) {
    output.push_str(&format!(
        "*{} contributions in {}.* Less {} More\n",
        format_number(view.calendar.total_contributions),
        view.window.label(),
        LEVEL_SHADES.join(" ")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{ContributionLevel, ContributionsData};
    use crate::layout::LayoutConfig;
    use crate::window::DateRange;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn placeholder_view(error: Option<&str>) -> View {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let window = DateRange::Year(2025).resolve(now).unwrap();
        let calendar = ContributionsData::placeholder(&window);
        View::build(
            "octocat",
            &window,
            &calendar,
            &LayoutConfig::default(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            error,
        )
        .unwrap()
    }

    #[test]
    fn test_render_contains_sections() {
        let md = render(&placeholder_view(None)).unwrap();

        assert!(md.starts_with("# 🟩 GitHub contributions: octocat (2025)"));
        assert!(md.contains("- **Window:** Jan 1, 2025 to Dec 31, 2025"));
        assert!(md.contains("- **Active span:** -"));
        assert!(md.contains("| Total Contributions | Daily Average | Longest Streak | Current Streak |"));
        assert!(md.contains("| 0 | 0.00 | 0 days | 0 days |"));
        assert!(md.contains("*0 contributions in 2025.* Less ·· ░░ ▒▒ ▓▓ ██ More"));
        assert!(!md.contains("⚠️"));
    }

    #[test]
    fn test_render_heatmap_rows() {
        let md = render(&placeholder_view(None)).unwrap();
        let block: Vec<&str> = md
            .split("```text\n")
            .nth(1)
            .unwrap()
            .split("```")
            .next()
            .unwrap()
            .lines()
            .collect();

        // Month line plus seven weekday rows
        assert_eq!(block.len(), 8);
        assert!(block[0].contains("Dec"));
        assert!(block[0].contains("Jan"));
        assert!(block[2].starts_with("Mon "));
        assert_eq!(block[1].matches('·').count(), 53 * CELL_WIDTH);
    }

    #[test]
    fn test_legend_follows_level_order() {
        let md = render(&placeholder_view(None)).unwrap();
        let legend = md.lines().last().unwrap();
        let scale = legend.split(" Less ").nth(1).unwrap();
        let positions: Vec<usize> = ContributionLevel::ALL
            .iter()
            .map(|level| scale.find(LEVEL_SHADES[level.index()]).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_render_error_note() {
        let md = render(&placeholder_view(Some("User not found"))).unwrap();
        assert!(md.contains("> ⚠️ User not found"));
    }
}
