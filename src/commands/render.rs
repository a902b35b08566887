use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;

use super::{fetch_view, snapshot_view, start_logging, SelectionArgs};
use crate::config::identity_to_dirname;
use crate::github::GitHubClient;
use crate::progress::FetchProgress;
use crate::renderer::{json, md, View};
use crate::session::CalendarSession;

/// Formats written when none are named
const ALL_FORMATS: [&str; 2] = ["md", "json"];

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Formats (comma-separated: md,json). Renders all if omitted.
    #[arg(value_name = "FORMATS")]
    pub formats: Option<String>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output directory (defaults to current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: RenderArgs) -> Result<()> {
    let view = match args.selection.snapshot {
        Some(ref path) => snapshot_view(path, args.selection.days_per_column, Utc::now())?,
        None => {
            let config = args.selection.to_config()?;
            start_logging(&config.identity)?;
            let client = GitHubClient::new(config.endpoint.clone())?;
            let mut session = CalendarSession::new();
            let mut progress = FetchProgress::new(true);
            fetch_view(&client, &mut session, &config, Utc::now(), &mut progress).await?
        }
    };

    if let Some(ref message) = view.error_message {
        eprintln!("Warning: {}", message);
    }

    let output_dir = args.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    for format in parse_formats(args.formats.as_deref()) {
        match format.as_str() {
            "md" => {
                let markdown = md::render(&view)?;
                let output_path = output_dir.join(output_filename(&view, "md"));
                std::fs::write(&output_path, markdown)
                    .with_context(|| format!("Failed to write {}", output_path.display()))?;
                eprintln!("Markdown report written to: {}", output_path.display());
            }
            "json" => {
                let snapshot = json::render(&view, Utc::now())?;
                let output_path = output_dir.join(output_filename(&view, "json"));
                std::fs::write(&output_path, snapshot)
                    .with_context(|| format!("Failed to write {}", output_path.display()))?;
                eprintln!("JSON snapshot written to: {}", output_path.display());
            }
            other => {
                eprintln!("Warning: Unknown format '{}', skipping", other);
            }
        }
    }

    Ok(())
}

/// Split a comma-separated format list; empty or missing means all formats.
pub fn parse_formats(arg: Option<&str>) -> Vec<String> {
    let requested: Vec<String> = arg
        .unwrap_or("")
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if requested.is_empty() {
        ALL_FORMATS.iter().map(|s| s.to_string()).collect()
    } else {
        requested
    }
}

/// `contribs-<identity>-<window key>.<ext>`
pub fn output_filename(view: &View, ext: &str) -> String {
    format!(
        "contribs-{}-{}.{}",
        identity_to_dirname(&view.identity),
        view.window.key(),
        ext
    )
}
