/// Runtime configuration: view knobs plus environment-derived locations.
use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use url::Url;

use crate::error::{Error, Result};
use crate::github::DEFAULT_ENDPOINT;
use crate::layout::{LayoutConfig, DEFAULT_COLUMN_PITCH, DEFAULT_DAYS_PER_COLUMN};
use crate::validate::is_valid_username;
use crate::window::DateRange;

pub const DATA_DIR_ENV: &str = "CONTRIBS_DATA_DIR";
pub const ENDPOINT_ENV: &str = "CONTRIBS_GRAPHQL_URL";
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Everything that decides what is fetched and how it is laid out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConfig {
    pub identity: String,
    pub token: Option<String>,
    pub year: Option<i32>,
    pub months_back: Option<u32>,
    pub days_per_column: usize,
    pub show_stats: bool,
    pub show_labels: bool,
    pub column_pitch: u32,
    pub endpoint: Url,
}

impl ViewConfig {
    /// Defaults for everything but the identity
    pub fn new(identity: impl Into<String>) -> Result<Self> {
        Ok(Self {
            identity: identity.into(),
            token: None,
            year: None,
            months_back: None,
            days_per_column: DEFAULT_DAYS_PER_COLUMN,
            show_stats: false,
            show_labels: true,
            column_pitch: DEFAULT_COLUMN_PITCH,
            endpoint: resolve_endpoint()?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_username(&self.identity) {
            return Err(Error::InvalidConfig(format!(
                "'{}' is not a valid GitHub username",
                self.identity
            )));
        }
        if self.days_per_column == 0 {
            return Err(Error::InvalidConfig(
                "days per column must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Date range selected by `year` / `months_back`, year first
    pub fn date_range(&self, today: NaiveDate) -> DateRange {
        DateRange::from_options(self.year, self.months_back, today)
    }

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            days_per_column: self.days_per_column,
            column_pitch: self.column_pitch,
        }
    }
}

/// Root directory for stored tokens, preferences and logs
pub fn resolve_data_root() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    Ok(PathBuf::from(".contribs"))
}

/// GraphQL endpoint, overridable for GitHub Enterprise
pub fn resolve_endpoint() -> Result<Url> {
    let raw = env::var(ENDPOINT_ENV).unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    Url::parse(&raw)
        .map_err(|e| Error::InvalidConfig(format!("invalid GraphQL endpoint '{}': {}", raw, e)))
}

/// Token from the command line, then `GITHUB_TOKEN`, then the stored one.
///
/// Empty strings count as absent.
pub fn resolve_token(flag: Option<String>, stored: Option<String>) -> Option<String> {
    flag.filter(|t| !t.is_empty())
        .or_else(|| env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()))
        .or_else(|| stored.filter(|t| !t.is_empty()))
}

pub fn identity_to_dirname(identity: &str) -> String {
    identity.to_ascii_lowercase()
}
