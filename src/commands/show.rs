use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use is_terminal::IsTerminal;
use tokio::sync::mpsc;

use super::{current_view, fetch_view, snapshot_view, start_logging, ColorChoice, SelectionArgs};
use crate::calendar::ContributionsData;
use crate::config::ViewConfig;
use crate::error::FetchError;
use crate::github::GitHubClient;
use crate::progress::FetchProgress;
use crate::renderer::{term, RenderOptions};
use crate::session::{CalendarRequest, CalendarSession, Completion, Ticket};

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Show the stats grid below the heat-map
    #[arg(long)]
    pub stats: bool,

    /// Hide month labels, day labels and the legend
    #[arg(long)]
    pub no_labels: bool,

    /// Re-fetch every SECS seconds and redraw
    #[arg(long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// When to color cells
    #[arg(long, value_enum, default_value_t)]
    pub color: ColorChoice,
}

pub async fn run(args: ShowArgs) -> Result<()> {
    let options = RenderOptions {
        show_labels: !args.no_labels,
        show_stats: args.stats,
        color: args.color.enabled(std::io::stdout().is_terminal()),
    };

    if let Some(ref path) = args.selection.snapshot {
        if args.watch.is_some() {
            anyhow::bail!("--watch cannot be combined with --snapshot");
        }
        let view = snapshot_view(path, args.selection.days_per_column, Utc::now())?;
        print!("{}", term::render(&view, &options));
        return Ok(());
    }

    let mut config = args.selection.to_config()?;
    config.show_stats = options.show_stats;
    config.show_labels = options.show_labels;
    start_logging(&config.identity)?;

    let client = GitHubClient::new(config.endpoint.clone())?;

    match args.watch {
        None => {
            let mut session = CalendarSession::new();
            let mut progress = FetchProgress::new(true);
            let view = fetch_view(&client, &mut session, &config, Utc::now(), &mut progress).await?;
            print!("{}", term::render(&view, &options));
            Ok(())
        }
        Some(0) => anyhow::bail!("--watch interval must be at least 1 second"),
        Some(secs) => watch(client, config, options, Duration::from_secs(secs)).await,
    }
}

type Delivery = (Ticket, std::result::Result<ContributionsData, FetchError>);

/// Fetch on every tick and redraw when the latest response lands.
///
/// Fetches run as separate tasks; a slow response that arrives after a newer
/// request was issued is dropped by the session.
async fn watch(
    client: GitHubClient,
    config: ViewConfig,
    options: RenderOptions,
    interval: Duration,
) -> Result<()> {
    let mut session = CalendarSession::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();
    let mut ticker = tokio::time::interval(interval);
    let clear_screen = std::io::stdout().is_terminal();

    tracing::info!(
        identity = %config.identity,
        interval_secs = interval.as_secs(),
        "Watching contribution calendar"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Utc::now();
                let window = config.date_range(now.date_naive()).resolve(now)?;
                let ticket = session.begin(CalendarRequest {
                    identity: config.identity.clone(),
                    window,
                });

                let client = client.clone();
                let token = config.token.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = client
                        .fetch_calendar(&ticket.request.identity, token.as_deref(), &ticket.request.window)
                        .await;
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => {
                if session.complete(ticket, result) != Completion::Stale {
                    let view = current_view(&session, &config, Utc::now())?;
                    if clear_screen {
                        print!("\x1b[2J\x1b[H");
                    }
                    print!("{}", term::render(&view, &options));
                    eprintln!(
                        "Refreshing every {}s. Press Ctrl-C to stop.",
                        interval.as_secs()
                    );
                }
            }
        }
    }
}
