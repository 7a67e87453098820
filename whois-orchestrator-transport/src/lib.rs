//! # whois-orchestrator-transport
//!
//! WHOIS transport capability: the network side of a WHOIS lookup.
//!
//! ## What it does
//!
//! | Operation | Round trips |
//! |-----------|-------------|
//! | [`WhoisTransport::query_domain`] | root server → TLD registry → up to `follow` referrals |
//! | [`WhoisTransport::query_ip`] | root server → RIR (→ one `ReferralServer` redirect) |
//! | [`WhoisTransport::query_asn`] | root server → RIR (→ one `ReferralServer` redirect) |
//!
//! Each round trip is bounded by the caller's timeout. Nothing is cached and
//! no connection is reused, so one transport can serve concurrent queries.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use whois_orchestrator_transport::{TcpWhoisTransport, WhoisTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = TcpWhoisTransport::new();
//!     let responses = transport
//!         .query_domain("example.com", Duration::from_secs(10), 2)
//!         .await?;
//!     for (server, record) in responses.iter() {
//!         println!("{server}: {} fields", record.fields.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Network problems surface as [`TransportError`]. A registry answering
//! "no match" or "rate limit exceeded" is a successful round trip: the
//! returned [`ServerRecord`] carries the message in its `error` field.

mod error;
mod parser;
mod servers;
mod tcp;
mod traits;
mod types;
mod utils;

pub use error::{Result, TransportError};
pub use parser::parse_response;
pub use tcp::TcpWhoisTransport;
pub use traits::WhoisTransport;
pub use types::{
    DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_ROOT_SERVER, DEFAULT_WHOIS_PORT, FieldValue,
    INTERNAL_FIELD_PREFIX, ServerRecord, ServerResponseMap, TransportConfig,
};
