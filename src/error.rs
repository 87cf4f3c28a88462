//! Error types for durl
//!
//! Two families of errors live here:
//! - [`Error`] aborts a whole run (bad configuration, file I/O, broken
//!   aggregation invariants).
//! - [`FetchError`] describes why a single URL failed. It never aborts the run;
//!   it is folded into that URL's [`FetchOutcome`](crate::types::FetchOutcome).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for durl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for durl
///
/// Every variant is fatal to the run it occurs in. Per-URL failures are
/// represented by [`FetchError`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_file")
        key: Option<String>,
    },

    /// I/O error (input file, output file, stdout)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ordered-mode aggregation invariant was violated
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// A fetch task panicked or was cancelled before producing a result
    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

impl Error {
    /// Shorthand for an [`Error::Config`] tied to a configuration key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Returns true if the error was caused by user input rather than the environment
    ///
    /// User errors are detected before any network activity starts.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::Config { .. })
    }
}

/// Errors raised while filling an ordered [`ResultSet`](crate::types::ResultSet)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    /// A result carried an index beyond the end of the set
    #[error("slot {index} is out of range for a set of {len} results")]
    SlotOutOfRange {
        /// The offending index
        index: usize,
        /// Number of slots in the set
        len: usize,
    },

    /// Two results were deposited into the same slot
    #[error("slot {index} was already filled")]
    SlotAlreadyFilled {
        /// The index written twice
        index: usize,
    },

    /// The set was read before every slot was filled
    #[error("{} of {len} slots were never filled (first missing: {})", missing.len(), missing.first().copied().unwrap_or_default())]
    Incomplete {
        /// Indices of the empty slots
        missing: Vec<usize>,
        /// Number of slots in the set
        len: usize,
    },
}

/// Classification of a per-URL failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// No response within the request deadline
    Timeout,
    /// Transport-level failure (DNS, connection refused, TLS, body read)
    Network,
    /// A response arrived but its status was not 200 OK
    UnexpectedStatus,
    /// The URL could not be turned into a request
    InvalidRequest,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Network => "network",
            FetchErrorKind::UnexpectedStatus => "unexpected_status",
            FetchErrorKind::InvalidRequest => "invalid_request",
        };
        f.write_str(s)
    }
}

/// Why a single fetch failed
///
/// The `Display` output is the message shown in reports.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The deadline expired before the outcome was known
    #[error("no response from url")]
    Timeout,

    /// Transport failure, carrying the underlying message
    #[error("{0}")]
    Network(String),

    /// The server answered with something other than 200 OK
    #[error("status code {0} is not expected")]
    UnexpectedStatus(u16),

    /// The URL is malformed or uses an unsupported scheme
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// The kind of this failure
    #[must_use]
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::Timeout => FetchErrorKind::Timeout,
            FetchError::Network(_) => FetchErrorKind::Network,
            FetchError::UnexpectedStatus(_) => FetchErrorKind::UnexpectedStatus,
            FetchError::InvalidRequest(_) => FetchErrorKind::InvalidRequest,
        }
    }

    /// Classify a `reqwest` error
    ///
    /// Timeouts reported by the client map to [`FetchError::Timeout`], request
    /// construction failures to [`FetchError::InvalidRequest`], and everything
    /// else to [`FetchError::Network`] with the full source chain as message.
    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_builder() {
            FetchError::InvalidRequest(error_chain(e))
        } else {
            FetchError::Network(error_chain(e))
        }
    }
}

/// Join an error and all of its sources into one message
///
/// reqwest's top-level message ("error sending request for url ...") hides the
/// useful part (DNS failure, connection refused) in its sources.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        let inner_message = inner.to_string();
        if !message.contains(&inner_message) {
            message.push_str(": ");
            message.push_str(&inner_message);
        }
        source = inner.source();
    }
    message
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_messages_match_report_format() {
        assert_eq!(FetchError::Timeout.to_string(), "no response from url");
        assert_eq!(
            FetchError::UnexpectedStatus(404).to_string(),
            "status code 404 is not expected"
        );
        assert_eq!(
            FetchError::Network("connection refused".into()).to_string(),
            "connection refused"
        );
        assert!(
            FetchError::InvalidRequest("relative URL without a base".into())
                .to_string()
                .contains("relative URL without a base")
        );
    }

    #[test]
    fn fetch_error_kinds() {
        assert_eq!(FetchError::Timeout.kind(), FetchErrorKind::Timeout);
        assert_eq!(
            FetchError::Network(String::new()).kind(),
            FetchErrorKind::Network
        );
        assert_eq!(
            FetchError::UnexpectedStatus(500).kind(),
            FetchErrorKind::UnexpectedStatus
        );
        assert_eq!(
            FetchError::InvalidRequest(String::new()).kind(),
            FetchErrorKind::InvalidRequest
        );
    }

    #[test]
    fn fetch_error_kind_serializes_snake_case() {
        let json = serde_json::to_string(&FetchErrorKind::UnexpectedStatus).unwrap();
        assert_eq!(json, "\"unexpected_status\"");
        assert_eq!(FetchErrorKind::InvalidRequest.to_string(), "invalid_request");
    }

    #[test]
    fn config_errors_are_user_errors() {
        let err = Error::config("request_timeout", "must be positive");
        assert!(err.is_user_error());
        assert_eq!(err.to_string(), "configuration error: must be positive");
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("request_timeout")),
            other => panic!("unexpected variant: {other:?}"),
        }

        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!io.is_user_error());
        assert!(!Error::TaskFailed("panicked".into()).is_user_error());
    }

    #[test]
    fn incomplete_aggregation_message_names_first_gap() {
        let err = AggregationError::Incomplete {
            missing: vec![2, 5],
            len: 6,
        };
        assert_eq!(
            err.to_string(),
            "2 of 6 slots were never filled (first missing: 2)"
        );
    }

    #[test]
    fn error_chain_appends_sources() {
        #[derive(Debug, Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(error_chain(&err), "outer: connection refused");
    }
}
