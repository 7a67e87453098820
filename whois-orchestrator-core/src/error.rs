//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use whois_orchestrator_transport::TransportError;

/// Message returned for empty or whitespace-only input.
pub const MISSING_INPUT_MESSAGE: &str = "Please enter a domain, IP address, or ASN";
/// Message returned when an ASN does not parse as an unsigned 32-bit number.
pub const INVALID_ASN_MESSAGE: &str = "Invalid ASN format";
/// Message returned when no registry holds data for a domain.
pub const DOMAIN_NOT_FOUND_MESSAGE: &str = "No WHOIS data found for this domain";

/// Lookup error type
///
/// The first three variants display their bare message: that text is what the
/// presentation layer shows, so no prefix is added.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum LookupError {
    /// Input rejected before any network call
    #[error("{0}")]
    ValidationError(String),

    /// Query issued, no registry returned data
    #[error("{0}")]
    NotFound(String),

    /// The primary registry answered with an error (no match, reserved, rate limited)
    #[error("{0}")]
    ServerReported(String),

    /// Network failure, DNS failure for the WHOIS server, or timeout
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The transport did not finish the whole lookup in time (seconds)
    #[error("WHOIS lookup did not complete within {0}s")]
    DeadlineExceeded(f64),
}

impl LookupError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ValidationError(_) | Self::NotFound(_) | Self::ServerReported(_) => true,
            Self::Transport(e) => e.is_expected(),
            Self::DeadlineExceeded(_) => false,
        }
    }
}

/// Lookup Result type alias
pub type LookupResult<T> = std::result::Result<T, LookupError>;
