use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all WHOIS transport operations.
///
/// Every network-facing variant carries the `server` that produced it, so the
/// message surfaced to the caller always names the registry involved.
///
/// A registry answering "no match" is *not* a transport error: it produces a
/// [`ServerRecord`](crate::ServerRecord) whose `error` field is set.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum TransportError {
    /// The query string cannot be sent on the wire (empty, contains line breaks).
    #[error("Invalid WHOIS query: {detail}")]
    InvalidQuery {
        /// What is wrong with the query.
        detail: String,
    },

    /// Connecting, writing or reading failed (includes DNS failures for the server itself).
    #[error("[{server}] Network error: {detail}")]
    NetworkError {
        /// WHOIS server that was being contacted.
        server: String,
        /// Error details.
        detail: String,
    },

    /// The round trip did not finish within the per-attempt timeout.
    #[error("[{server}] WHOIS query timed out after {timeout_secs}s")]
    Timeout {
        /// WHOIS server that was being contacted.
        server: String,
        /// The timeout that expired, in seconds (fractional for sub-second limits).
        timeout_secs: f64,
    },

    /// The server sent more bytes than the configured response cap.
    #[error("[{server}] Response exceeds {limit} bytes")]
    ResponseTooLarge {
        /// WHOIS server that was being contacted.
        server: String,
        /// Configured response cap in bytes.
        limit: usize,
    },
}

impl TransportError {
    /// Whether this is expected behaviour (bad user input) rather than an infrastructure problem.
    ///
    /// Returning `true` means the failure should be logged at `warn`, `false` at `error`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::InvalidQuery { .. })
    }

    pub(crate) fn network(server: &str, detail: impl ToString) -> Self {
        Self::NetworkError {
            server: server.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, TransportError>`.
pub type Result<T> = std::result::Result<T, TransportError>;
