use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use contribs::commands::render::RenderArgs;
use contribs::commands::show::ShowArgs;
use contribs::commands::{render, show};
use contribs::{login, logout, status};

// Help text constants
const HELP_MAIN: &str = "\
contribs: GitHub contribution heat-map in the terminal

Commands:
    show                 Fetch a calendar and print the heat-map.
    render [formats]     Write reports (md,json).
    login                Store a GitHub token for an identity.
    logout               Remove stored identities.
    status               Show stored identities and token state.

Usage:
    contribs show --user <login> [--year <y> | --months <n>] [--stats]
    contribs render [formats] --user <login> [--output <dir>]

Environment:
    GITHUB_TOKEN         Token used when --token is not given
    CONTRIBS_DATA_DIR    Data directory (default: .contribs)
    CONTRIBS_GRAPHQL_URL GraphQL endpoint override
    RUST_LOG             Log filter (logs go to <data dir>/logs/contribs.log)

More help:
    contribs --help show
    contribs --help render";

const HELP_SHOW: &str = "\
Fetch a contribution calendar and print it as a heat-map

Usage:
    contribs show [--user <login>] [--token <t>] [--year <y> | --months <n>]
                  [--days-per-column <n>] [--stats] [--no-labels]
                  [--snapshot <file>] [--watch <secs>] [--color auto|always|never]

Options:
    --user <login>         GitHub username. Defaults to the stored identity.
    --token <t>            Token; falls back to GITHUB_TOKEN, then the stored token.
    --year <y>             Calendar year (wins over --months). Default: current year.
    --months <n>           Window of the last n months.
    --days-per-column <n>  Days per column (default 7).
    --stats                Show total, daily average and streaks.
    --no-labels            Hide month labels, day labels and the legend.
    --snapshot <file>      Render a JSON snapshot written by 'render json'.
    --watch <secs>         Re-fetch every <secs> seconds.

Examples:
  contribs show --user octocat --stats
  contribs show --user octocat --months 6 --days-per-column 14";

const HELP_RENDER: &str = "\
Write reports (md,json)

Usage:
    contribs render [formats] [selection flags as for show] [--output <dir>]

Options:
    [formats]        Comma-separated formats (md,json). Empty renders all.
    --output <dir>   Output directory (default: current dir).
                     Files are named contribs-<user>-<window>.<ext>.

Examples:
  contribs render md --user octocat --year 2024 --output reports
  contribs render md --snapshot reports/contribs-octocat-2024.json";

#[derive(Parser)]
#[command(name = "contribs", disable_help_flag = true)]
#[command(about = "GitHub contribution heat-map", long_about = None)]
struct Cli {
    /// Show help (global or per topic). Example: contribs --help show
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    help: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a contribution calendar and print the heat-map
    Show(ShowArgs),
    /// Write Markdown and/or JSON reports
    Render(RenderArgs),
    /// Store a GitHub token for an identity
    Login {
        /// GitHub username. If omitted, prompted.
        #[arg(long)]
        user: Option<String>,
    },
    /// Remove stored identities and their tokens
    Logout {
        /// GitHub username. If omitted, interactive selection.
        #[arg(long)]
        user: Option<String>,
    },
    /// Show stored identities and token state
    Status {
        /// GitHub username. If omitted, show all.
        #[arg(long)]
        user: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(help_topic) = cli.help {
        let topic = help_topic.trim();
        if topic.is_empty() {
            println!("{}", HELP_MAIN);
        } else if topic.eq_ignore_ascii_case("show") {
            println!("{}", HELP_SHOW);
        } else if topic.eq_ignore_ascii_case("render") {
            println!("{}", HELP_RENDER);
        } else {
            println!("Unknown help topic: {}", topic);
        }
        return Ok(());
    }

    let Some(cmd) = cli.command else {
        eprintln!("No command specified. Use 'contribs show' to print a heat-map.");
        eprintln!("Example: contribs show --user octocat");
        return Ok(());
    };

    match cmd {
        Commands::Show(args) => block_on(show::run(args)),
        Commands::Render(args) => block_on(render::run(args)),
        Commands::Login { user } => login::run(user),
        Commands::Logout { user } => logout::run(user),
        Commands::Status { user } => status::run(user),
    }
}

/// Only the network-backed commands need a runtime.
fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(future)
}
