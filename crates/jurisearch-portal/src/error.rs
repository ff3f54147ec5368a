use jurisearch_core::PreconditionViolation;
use thiserror::Error;

use crate::progress::HandshakeStep;

/// Failure talking to the portal over HTTP.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
    #[error("invalid portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid portal configuration: {0}")]
    Config(String),
}

impl From<reqwest::Error> for PortalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PortalError::Timeout(err)
        } else {
            PortalError::Http(err)
        }
    }
}

/// Session negotiation failed; no token was produced.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session negotiation failed at {step}: {source}")]
    Step {
        step: HandshakeStep,
        #[source]
        source: PortalError,
    },
    #[error("session negotiation aborted: {0}")]
    Aborted(String),
}

/// Outcome of a search that did not produce a count.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Precondition(#[from] PreconditionViolation),
    #[error("session expired; negotiate a new session")]
    SessionExpired,
    #[error("search failed: {0}")]
    Transient(#[source] PortalError),
}

impl SearchError {
    /// Only a fresh session can make this search succeed.
    pub fn needs_reauthentication(&self) -> bool {
        matches!(self, SearchError::SessionExpired)
    }

    /// Repeating the same search with the same token may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_needs_reauthentication_only() {
        assert!(SearchError::SessionExpired.needs_reauthentication());
        assert!(!SearchError::SessionExpired.is_retryable());
    }

    #[test]
    fn transient_is_retryable() {
        let err = SearchError::Transient(PortalError::UnexpectedResponse("x".into()));
        assert!(err.is_retryable());
        assert!(!err.needs_reauthentication());
    }

    #[test]
    fn precondition_is_neither() {
        let err = SearchError::from(PreconditionViolation::EmptyQuery);
        assert!(!err.is_retryable());
        assert!(!err.needs_reauthentication());
        assert_eq!(err.to_string(), "search query is empty");
    }

    #[test]
    fn step_error_names_the_step() {
        let err = SessionError::Step {
            step: HandshakeStep::Confirm,
            source: PortalError::Server {
                status: 503,
                body: "down".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "session negotiation failed at confirm: server returned 503: down"
        );
    }
}
