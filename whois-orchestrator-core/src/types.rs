//! Public types returned by WHOIS lookups.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// Default per-attempt timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default number of referral hops followed after the TLD registry.
pub const DEFAULT_FOLLOW: u8 = 2;

/// Kind of resource a query string names.
///
/// Decided once per query by [`classify`](crate::classify) and never revised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// Domain name (the fallback for anything that is neither an IP nor an ASN).
    Domain,
    /// IPv4 or IPv6 literal.
    IpAddress,
    /// Autonomous System Number, with or without an `AS`/`ASN` prefix.
    Asn,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::IpAddress => write!(f, "IP address"),
            Self::Asn => write!(f, "ASN"),
        }
    }
}

/// Registration fields recognized in a WHOIS response.
///
/// Every field is optional: presence means the response contained a
/// recognizable line for it. Dates keep the registry's own text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedWhoisData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    /// Sponsoring registrar (e.g. "MarkMonitor Inc.").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    /// EPP status codes, in response order, case-insensitively unique.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
    /// Name servers, in response order, case-insensitively unique.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,
    /// DNSSEC state as reported (e.g. "unsigned", "signedDelegation").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<String>,
}

impl ParsedWhoisData {
    /// `true` when no field was recognized.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Successful lookup: the primary registry's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisRecord {
    /// Resource kind the input was classified as.
    pub kind: ResourceKind,
    /// Raw response text (or its synthesized equivalent).
    pub data: String,
    /// Label of the server that produced `data`.
    pub server: String,
    /// Recognized fields; `None` when nothing was recognized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ParsedWhoisData>,
}

/// Outcome handed to the presentation layer.
///
/// Serialized with a `status` tag so the consumer can branch without
/// inspecting optional fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum WhoisResult {
    Success(WhoisRecord),
    Failure {
        /// Human-readable message, the only failure information surfaced.
        error: String,
    },
}

impl WhoisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure message, if this is a failure.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// The originating server label, if this is a success.
    pub fn server(&self) -> Option<&str> {
        match self {
            Self::Success(record) => Some(&record.server),
            Self::Failure { .. } => None,
        }
    }

    pub fn record(&self) -> Option<&WhoisRecord> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failure { .. } => None,
        }
    }
}

impl From<Result<WhoisRecord, LookupError>> for WhoisResult {
    fn from(result: Result<WhoisRecord, LookupError>) -> Self {
        match result {
            Ok(record) => Self::Success(record),
            Err(e) => Self::Failure {
                error: e.to_string(),
            },
        }
    }
}

/// Per-query options.
///
/// Deserializes from a partial JSON object; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Timeout for each network round trip, in seconds.
    pub timeout_secs: u64,
    /// Referral hops followed after the TLD registry for domain queries.
    pub follow: u8,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            follow: DEFAULT_FOLLOW,
        }
    }
}

impl QueryOptions {
    #[must_use]
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    #[must_use]
    pub fn with_follow(mut self, follow: u8) -> Self {
        self.follow = follow;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
