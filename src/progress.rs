/// Spinner shown while a calendar is being fetched.
///
/// Animated when stderr is a TTY; otherwise progress is reported via text
/// output only.
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use std::time::Duration;

use crate::window::DateWindow;

/// Message shown next to the spinner, e.g. `Fetching octocat (2025)`
pub fn fetch_message(identity: &str, window: &DateWindow) -> String {
    format!("Fetching {} ({})", identity, window.label())
}

#[derive(Clone)]
pub struct FetchProgress {
    spinner: Option<ProgressBar>,
    is_tty: bool,
}

impl FetchProgress {
    /// Creates a spinner when stderr is a terminal and `enabled` is set.
    pub fn new(enabled: bool) -> Self {
        let is_tty = enabled && std::io::stderr().is_terminal();
        Self {
            spinner: None,
            is_tty,
        }
    }

    /// Start (or restart) the spinner with a message.
    pub fn start(&mut self, msg: String) {
        self.finish();
        if !self.is_tty {
            tracing::debug!("{}", msg);
            return;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    /// Clear the spinner, if any.
    pub fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}
