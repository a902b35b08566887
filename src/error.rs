//! Error types for contribs

use thiserror::Error;

/// Failure while fetching or normalizing a contribution calendar.
///
/// Every variant is recoverable: callers fall back to a placeholder calendar
/// for the same window and surface [`FetchError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network failure or non-2xx response
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// HTTP 403 carrying a rate-limit indication
    #[error("GitHub API rate limit exceeded. Please check your token or try again later.")]
    RateLimited { authenticated: bool },

    /// Response parsed but carries a GraphQL error payload
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Response parsed but violates the calendar data model
    #[error("invalid calendar data: {0}")]
    InvalidInput(String),
}

impl FetchError {
    /// Message shown to the user next to the placeholder calendar.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::RateLimited {
                authenticated: false,
            } => format!(
                "{} No token was supplied: pass --token, set GITHUB_TOKEN, or run 'contribs login' to raise the limit.",
                self
            ),
            other => other.to_string(),
        }
    }
}

/// Main error type for the contribs library
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected before any work was done
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Calendar data violates the data model
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Fetch failure that was not converted into a placeholder
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for contribs
pub type Result<T> = std::result::Result<T, Error>;
