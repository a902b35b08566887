//! `show` and `render`: shared selection flags and the fetch-into-view pipeline.

pub mod render;
pub mod show;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use crate::account_selector::AccountSelector;
use crate::config::{resolve_data_root, resolve_token, ViewConfig};
use crate::github::GitHubClient;
use crate::layout::{LayoutConfig, DEFAULT_DAYS_PER_COLUMN};
use crate::logging::init_logging;
use crate::progress::{fetch_message, FetchProgress};
use crate::renderer::json::Snapshot;
use crate::renderer::View;
use crate::secrets::TokenStore;
use crate::session::{CalendarRequest, CalendarSession};

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Whether the renderer should emit colored cells.
    pub fn enabled(self, stdout_is_tty: bool) -> bool {
        match self {
            Self::Auto => stdout_is_tty,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Flags selecting whose calendar, which window, and how it is sliced
#[derive(Debug, Clone, Args)]
pub struct SelectionArgs {
    /// GitHub username. If omitted, a stored identity is used.
    #[arg(long)]
    pub user: Option<String>,

    /// GitHub token (falls back to GITHUB_TOKEN, then the stored token)
    #[arg(long)]
    pub token: Option<String>,

    /// Calendar year (takes precedence over --months)
    #[arg(long)]
    pub year: Option<i32>,

    /// Number of months back from now
    #[arg(long)]
    pub months: Option<u32>,

    /// Days stacked in one column
    #[arg(long, default_value_t = DEFAULT_DAYS_PER_COLUMN)]
    pub days_per_column: usize,

    /// Render a saved JSON snapshot instead of fetching
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
}

impl SelectionArgs {
    /// Resolve identity and token, then build and validate the view config.
    pub fn to_config(&self) -> Result<ViewConfig> {
        let mut selector = AccountSelector::new()?;
        let identity = selector.select_identity(self.user.clone())?;
        let stored = TokenStore::new(&identity)?.get_token();

        let mut config = ViewConfig::new(identity)?;
        config.token = resolve_token(self.token.clone(), stored);
        config.year = self.year;
        config.months_back = self.months;
        config.days_per_column = self.days_per_column;
        config.validate()?;

        Ok(config)
    }
}

/// Start file logging under the data root.
pub fn start_logging(identity: &str) -> Result<()> {
    let data_root = resolve_data_root()?;
    init_logging(&data_root, identity)
}

/// Fetch once through `session` and build the view of whatever it applied.
///
/// Fetch failures do not surface as errors: the session falls back to a
/// placeholder calendar and the view carries the message.
pub async fn fetch_view(
    client: &GitHubClient,
    session: &mut CalendarSession,
    config: &ViewConfig,
    now: DateTime<Utc>,
    progress: &mut FetchProgress,
) -> Result<View> {
    let window = config.date_range(now.date_naive()).resolve(now)?;
    let ticket = session.begin(CalendarRequest {
        identity: config.identity.clone(),
        window: window.clone(),
    });

    progress.start(fetch_message(&config.identity, &window));
    let result = client
        .fetch_calendar(&config.identity, config.token.as_deref(), &window)
        .await;
    progress.finish();

    session.complete(ticket, result);
    current_view(session, config, now)
}

/// View of the session's current calendar.
pub fn current_view(
    session: &CalendarSession,
    config: &ViewConfig,
    now: DateTime<Utc>,
) -> Result<View> {
    let (request, calendar) = session
        .current()
        .context("No calendar has been applied yet")?;
    let view = View::build(
        &request.identity,
        &request.window,
        calendar,
        &config.layout(),
        now.date_naive(),
        session.error_message(),
    )?;
    Ok(view)
}

/// Load a snapshot and lay it out with the given slicing.
pub fn snapshot_view(path: &Path, days_per_column: usize, now: DateTime<Utc>) -> Result<View> {
    let snapshot = Snapshot::load_from_file(path)
        .with_context(|| format!("Failed to load snapshot from {}", path.display()))?;
    let layout = LayoutConfig {
        days_per_column,
        ..Default::default()
    };
    let view = snapshot.to_view(&layout, now.date_naive())?;
    tracing::info!(
        identity = %view.identity,
        path = %path.display(),
        "Loaded snapshot"
    );
    Ok(view)
}
