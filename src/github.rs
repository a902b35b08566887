//! HTTP client for the GitHub GraphQL contributions API
//!
//! Issues a single fixed query per calendar and normalizes the response into
//! [`ContributionsData`]. Every failure is reported as a [`FetchError`] so the
//! caller can fall back to a placeholder calendar.

use std::time::Duration;

use chrono::{NaiveDate, SecondsFormat};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::calendar::{ContributionDay, ContributionLevel, ContributionWeek, ContributionsData};
use crate::error::{Error, FetchError, Result};
use crate::window::DateWindow;

/// Public GitHub GraphQL endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const REQUEST_TIMEOUT_SECS: u64 = 30;

const CONTRIBUTIONS_QUERY: &str = "\
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
            contributionLevel
          }
        }
      }
    }
  }
}";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: QueryVariables<'a>,
}

#[derive(Serialize)]
struct QueryVariables<'a> {
    username: &'a str,
    from: String,
    to: String,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

#[derive(Deserialize)]
struct ResponseData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: CollectionNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionNode {
    contribution_calendar: CalendarNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarNode {
    total_contributions: i64,
    weeks: Vec<WeekNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeekNode {
    contribution_days: Vec<DayNode>,
}

/// Raw day as sent by the API, validated before it becomes a [`ContributionDay`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DayNode {
    date: String,
    contribution_count: i64,
    contribution_level: ContributionLevel,
}

/// HTTP client for the contributions query
#[derive(Clone)]
pub struct GitHubClient {
    http_client: reqwest::Client,
    endpoint: Url,
}

impl GitHubClient {
    /// Create a client for `endpoint`.
    ///
    /// Returns an error if the endpoint is not http(s) or the HTTP client
    /// cannot be built.
    pub fn new(endpoint: Url) -> Result<Self> {
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "GraphQL endpoint must be http(s): {}",
                endpoint
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("contribs/", env!("CARGO_PKG_VERSION"))),
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Fetch and normalize the contribution calendar of `identity` for `window`.
    ///
    /// An empty token is treated as no token.
    pub async fn fetch_calendar(
        &self,
        identity: &str,
        token: Option<&str>,
        window: &DateWindow,
    ) -> std::result::Result<ContributionsData, FetchError> {
        let token = token.filter(|t| !t.is_empty());
        let from = window.from.to_rfc3339_opts(SecondsFormat::Secs, true);
        let to = window.to.to_rfc3339_opts(SecondsFormat::Secs, true);

        tracing::debug!(
            endpoint = %self.endpoint,
            identity,
            window = %window.label(),
            from = %from,
            to = %to,
            token_preview = %token.map(token_preview).unwrap_or_else(|| "<none>".to_string()),
            "Requesting contribution calendar"
        );

        let body = GraphQlRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: QueryVariables {
                username: identity,
                from,
                to,
            },
        };

        let mut request = self.http_client.post(self.endpoint.clone()).json(&body);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await.map_err(|e| FetchError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: format!("HTTP request failed: {}", e),
        })?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("");
        let text = response.text().await.map_err(|e| FetchError::Transport {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), body = %text, "GitHub API error");
        }

        let data = interpret_response(status.as_u16(), reason, &text, token.is_some())?;
        tracing::info!(
            identity,
            total = data.total_contributions,
            days = data.day_count(),
            "Fetched contribution calendar"
        );
        Ok(data)
    }
}

fn token_preview(token: &str) -> String {
    format!("{}...", token.chars().take(4).collect::<String>())
}

/// Turn an HTTP status and body into a calendar or a classified error.
pub fn interpret_response(
    status: u16,
    reason: &str,
    body: &str,
    authenticated: bool,
) -> std::result::Result<ContributionsData, FetchError> {
    if !(200..300).contains(&status) {
        if status == 403 && body.to_ascii_lowercase().contains("rate limit exceeded") {
            return Err(FetchError::RateLimited { authenticated });
        }
        return Err(FetchError::Transport {
            status: Some(status),
            message: format!("GitHub API error ({}): {}. {}", status, reason, body),
        });
    }

    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("unexpected response body: {}", e)))?;

    if let Some(first) = response.errors.as_ref().and_then(|errors| errors.first()) {
        tracing::warn!(message = %first.message, "GraphQL errors in response");
        return Err(FetchError::GraphQl(first.message.clone()));
    }

    let calendar = response
        .data
        .and_then(|data| data.user)
        .map(|user| user.contributions_collection.contribution_calendar)
        .ok_or_else(|| FetchError::MalformedResponse("response has no user data".to_string()))?;

    normalize(calendar)
}

fn normalize(calendar: CalendarNode) -> std::result::Result<ContributionsData, FetchError> {
    let total = u64::try_from(calendar.total_contributions).map_err(|_| {
        FetchError::InvalidInput(format!(
            "negative total contributions: {}",
            calendar.total_contributions
        ))
    })?;

    let weeks = calendar
        .weeks
        .into_iter()
        .map(|week| -> std::result::Result<ContributionWeek, FetchError> {
            let contribution_days = week
                .contribution_days
                .into_iter()
                .map(validate_day)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ContributionWeek { contribution_days })
        })
        .collect::<std::result::Result<Vec<_>, FetchError>>()?;

    ContributionsData::from_weeks(total, weeks).map_err(|e| match e {
        Error::InvalidInput(message) => FetchError::InvalidInput(message),
        other => FetchError::MalformedResponse(other.to_string()),
    })
}

fn validate_day(day: DayNode) -> std::result::Result<ContributionDay, FetchError> {
    let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
        .map_err(|_| FetchError::InvalidInput(format!("unparseable date: {:?}", day.date)))?;
    let count = u32::try_from(day.contribution_count).map_err(|_| {
        FetchError::InvalidInput(format!(
            "invalid contribution count {} on {}",
            day.contribution_count, date
        ))
    })?;
    Ok(ContributionDay {
        date,
        count,
        level: day.contribution_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn calendar_body(days: serde_json::Value, total: i64) -> String {
        json!({
            "data": {
                "user": {
                    "contributionsCollection": {
                        "contributionCalendar": {
                            "totalContributions": total,
                            "weeks": [{ "contributionDays": days }]
                        }
                    }
                }
            }
        })
        .to_string()
    }

    #[test]
    fn test_success_normalizes() {
        let body = calendar_body(
            json!([
                {"date": "2025-01-05", "contributionCount": 0, "contributionLevel": "NONE"},
                {"date": "2025-01-06", "contributionCount": 3, "contributionLevel": "SECOND_QUARTILE"},
                {"date": "2025-01-07", "contributionCount": 1, "contributionLevel": "FIRST_QUARTILE"},
                {"date": "2025-01-08", "contributionCount": 0, "contributionLevel": "NONE"}
            ]),
            4,
        );
        let data = interpret_response(200, "OK", &body, true).unwrap();
        assert_eq!(data.total_contributions, 4);
        assert_eq!(data.day_count(), 4);
        assert_eq!(data.first_contribution, NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(data.last_contribution, NaiveDate::from_ymd_opt(2025, 1, 7));
        assert_eq!(
            data.weeks[0].contribution_days[1].level,
            ContributionLevel::SecondQuartile
        );
    }

    #[test]
    fn test_rate_limited() {
        let body = r#"{"message":"API rate limit exceeded for 1.2.3.4."}"#;
        assert_eq!(
            interpret_response(403, "Forbidden", body, false),
            Err(FetchError::RateLimited {
                authenticated: false
            })
        );
    }

    #[test]
    fn test_forbidden_without_rate_limit_is_transport() {
        let err = interpret_response(403, "Forbidden", "nope", true).unwrap_err();
        assert!(matches!(err, FetchError::Transport { status: Some(403), .. }));
    }

    #[test]
    fn test_non_success_status() {
        let err = interpret_response(502, "Bad Gateway", "upstream down", true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "GitHub API error (502): Bad Gateway. upstream down"
        );
    }

    #[test]
    fn test_graphql_errors() {
        let body = json!({
            "data": { "user": null },
            "errors": [
                { "message": "Could not resolve to a User with the login of 'nobody'." },
                { "message": "second" }
            ]
        })
        .to_string();
        assert_eq!(
            interpret_response(200, "OK", &body, true),
            Err(FetchError::GraphQl(
                "Could not resolve to a User with the login of 'nobody'.".to_string()
            ))
        );
    }

    #[test]
    fn test_null_user_is_malformed() {
        let body = json!({ "data": { "user": null } }).to_string();
        assert!(matches!(
            interpret_response(200, "OK", &body, true),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            interpret_response(200, "OK", "<html>", true),
            Err(FetchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_negative_count_is_invalid_input() {
        let body = calendar_body(
            json!([{"date": "2025-01-05", "contributionCount": -1, "contributionLevel": "NONE"}]),
            0,
        );
        assert!(matches!(
            interpret_response(200, "OK", &body, true),
            Err(FetchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_date_is_invalid_input() {
        let body = calendar_body(
            json!([{"date": "2025-13-45", "contributionCount": 0, "contributionLevel": "NONE"}]),
            0,
        );
        assert!(matches!(
            interpret_response(200, "OK", &body, true),
            Err(FetchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_date_gap_is_invalid_input() {
        let body = calendar_body(
            json!([
                {"date": "2025-01-05", "contributionCount": 0, "contributionLevel": "NONE"},
                {"date": "2025-01-09", "contributionCount": 0, "contributionLevel": "NONE"}
            ]),
            0,
        );
        assert!(matches!(
            interpret_response(200, "OK", &body, true),
            Err(FetchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let body = GraphQlRequest {
            query: CONTRIBUTIONS_QUERY,
            variables: QueryVariables {
                username: "octocat",
                from: "2025-01-01T00:00:00Z".to_string(),
                to: "2025-12-31T23:59:59Z".to_string(),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["variables"]["username"], "octocat");
        assert_eq!(value["variables"]["from"], "2025-01-01T00:00:00Z");
        assert!(value["query"]
            .as_str()
            .unwrap()
            .contains("contributionCalendar"));
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let url = Url::parse("ftp://example.org/graphql").unwrap();
        assert!(matches!(
            GitHubClient::new(url),
            Err(Error::InvalidConfig(_))
        ));
    }
}
