//! WHOIS lookup core for WHOIS Orchestrator
//!
//! Turns a free-form query string into a WHOIS result: the input is
//! classified as a domain, an IP address, or an ASN, sent through a
//! [`WhoisTransport`], and the primary registry's answer comes back as raw
//! text plus the registration fields recognized in it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use whois_orchestrator_core::{QueryOptions, WhoisResult, WhoisService};
//! use whois_orchestrator_core::TcpWhoisTransport;
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let service = WhoisService::with_options(
//!     Arc::new(TcpWhoisTransport::new()),
//!     QueryOptions::default().with_follow(1),
//! );
//!
//! match service.query("AS15169").await {
//!     WhoisResult::Success(record) => println!("{} answered:\n{}", record.server, record.data),
//!     WhoisResult::Failure { error } => eprintln!("{error}"),
//! }
//! # }
//! ```
//!
//! # Error Handling
//!
//! [`WhoisService::query`] never fails; errors are folded into
//! [`WhoisResult::Failure`]. [`WhoisService::lookup`] returns the typed
//! [`LookupError`] instead.

mod error;
mod services;
mod types;

#[cfg(test)]
mod test_utils;

pub use error::{
    DOMAIN_NOT_FOUND_MESSAGE, INVALID_ASN_MESSAGE, LookupError, LookupResult,
    MISSING_INPUT_MESSAGE,
};
pub use services::{
    CanonicalField, FALLBACK_SERVER_LABEL, FIELD_ALIASES, WhoisService, classify, extract,
    lookup_alias, normalize, parse_asn, parse_record,
};
pub use types::{
    DEFAULT_FOLLOW, DEFAULT_TIMEOUT_SECS, ParsedWhoisData, QueryOptions, ResourceKind,
    WhoisRecord, WhoisResult,
};

// Re-export transport types
pub use whois_orchestrator_transport::{
    ServerRecord, ServerResponseMap, TcpWhoisTransport, TransportConfig, TransportError,
    WhoisTransport,
};
