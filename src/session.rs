/// Current-calendar state with request supersession.
///
/// Each fetch is tagged with a monotonically increasing sequence number. Only
/// the response carrying the latest number is applied; responses from
/// superseded requests are dropped, however late they arrive.
use crate::calendar::ContributionsData;
use crate::error::FetchError;
use crate::window::DateWindow;

/// What a fetch was asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRequest {
    pub identity: String,
    pub window: DateWindow,
}

/// Handle returned by [`CalendarSession::begin`], passed back on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub seq: u64,
    pub request: CalendarRequest,
}

/// Outcome of handing a response to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Response applied as-is
    Applied,
    /// Request failed; placeholder calendar installed and error message set
    Fallback,
    /// A newer request exists; response discarded
    Stale,
}

/// The calendar currently shown, plus bookkeeping for in-flight requests
#[derive(Debug, Default)]
pub struct CalendarSession {
    latest_seq: u64,
    applied_seq: u64,
    current: Option<(CalendarRequest, ContributionsData)>,
    error_message: Option<String>,
}

impl CalendarSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request; any earlier outstanding request becomes stale.
    pub fn begin(&mut self, request: CalendarRequest) -> Ticket {
        self.latest_seq += 1;
        Ticket {
            seq: self.latest_seq,
            request,
        }
    }

    /// Apply a response if it belongs to the latest request.
    ///
    /// A failed request installs an all-zero calendar for the ticket's window
    /// so downstream layout always has a complete calendar.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        result: Result<ContributionsData, FetchError>,
    ) -> Completion {
        if ticket.seq != self.latest_seq {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.latest_seq,
                identity = %ticket.request.identity,
                "Discarding stale calendar response"
            );
            return Completion::Stale;
        }

        self.applied_seq = ticket.seq;
        match result {
            Ok(data) => {
                self.error_message = None;
                self.current = Some((ticket.request, data));
                Completion::Applied
            }
            Err(err) => {
                tracing::warn!(
                    identity = %ticket.request.identity,
                    error = %err,
                    "Contribution fetch failed, using empty calendar"
                );
                let placeholder = ContributionsData::placeholder(&ticket.request.window);
                self.error_message = Some(err.user_message());
                self.current = Some((ticket.request, placeholder));
                Completion::Fallback
            }
        }
    }

    /// Calendar currently shown, with the request it answers
    pub fn current(&self) -> Option<(&CalendarRequest, &ContributionsData)> {
        self.current.as_ref().map(|(request, data)| (request, data))
    }

    /// User-facing message of the last failed request, cleared by a success
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// True while the latest request has not been completed
    pub fn is_loading(&self) -> bool {
        self.applied_seq != self.latest_seq
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }
}
