/// File logging for CLI sessions.
///
/// Everything goes to `{data_root}/logs/contribs.log`; the terminal only
/// shows rendered output and status lines.
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "contribs.log";

/// Filter used when RUST_LOG is unset
const DEFAULT_FILTER: &str = "info,reqwest=debug";

/// Initializes file logging and marks the start of a session.
///
/// Calling it again (e.g. from tests) keeps the first subscriber but still
/// appends a new separator.
///
/// # Arguments
///
/// * `data_root` - Path to the data directory
/// * `identity` - GitHub login the session is about
pub fn init_logging(data_root: &Path, identity: &str) -> Result<()> {
    let log_dir = data_root.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();

    write_session_separator(&log_dir.join(LOG_FILE_NAME), identity);
    tracing::info!("Logging initialized for identity: {}", identity);

    Ok(())
}

fn write_session_separator(log_file: &Path, identity: &str) {
    let rule = "=".repeat(80);
    let opened = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file);
    if let Ok(mut file) = opened {
        let _ = writeln!(
            file,
            "\n{rule}\n[{}] New session: {identity}\n{rule}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        );
    }
}
