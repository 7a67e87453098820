//! Query orchestration: classification, strategy dispatch, result shaping.
//!
//! [`WhoisService`] owns a transport and the per-query options. Each call is
//! independent; concurrent calls share nothing but the transport.

mod classifier;
mod extractor;
mod normalizer;
mod whois;

use std::net::IpAddr;
use std::sync::Arc;

use log::{debug, error, warn};
use whois_orchestrator_transport::{TcpWhoisTransport, WhoisTransport};

use crate::error::{LookupError, LookupResult, MISSING_INPUT_MESSAGE};
use crate::types::{QueryOptions, ResourceKind, WhoisRecord, WhoisResult};

pub use classifier::{classify, parse_asn};
pub use extractor::{FALLBACK_SERVER_LABEL, extract};
pub use normalizer::{CanonicalField, FIELD_ALIASES, lookup_alias, normalize};
pub use whois::parse_record;

/// Trim and lowercase a query string; empty input is rejected.
fn normalize_resource(resource: &str) -> LookupResult<String> {
    let resource = resource.trim();
    if resource.is_empty() {
        return Err(LookupError::ValidationError(
            MISSING_INPUT_MESSAGE.to_string(),
        ));
    }
    Ok(resource.to_lowercase())
}

/// ASCII form of a domain for the wire.
///
/// Unicode labels become Punycode. Names IDNA refuses are passed through
/// unchanged; the registry is the one to reject them.
fn domain_to_ascii(domain: &str) -> String {
    match idna::domain_to_ascii(domain) {
        Ok(ascii) if !ascii.is_empty() => ascii,
        _ => domain.to_string(),
    }
}

/// Entry point for WHOIS lookups.
///
/// ```rust,no_run
/// use whois_orchestrator_core::WhoisService;
/// # async fn demo() {
/// let service = WhoisService::default();
/// let result = service.query("example.com").await;
/// if let Some(record) = result.record() {
///     println!("{}: {}", record.server, record.data);
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct WhoisService {
    transport: Arc<dyn WhoisTransport>,
    options: QueryOptions,
}

impl Default for WhoisService {
    /// Port-43 transport with default options.
    fn default() -> Self {
        Self::new(Arc::new(TcpWhoisTransport::new()))
    }
}

impl std::fmt::Debug for WhoisService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhoisService")
            .field("transport", &self.transport.id())
            .field("options", &self.options)
            .finish()
    }
}

impl WhoisService {
    pub fn new(transport: Arc<dyn WhoisTransport>) -> Self {
        Self::with_options(transport, QueryOptions::default())
    }

    pub fn with_options(transport: Arc<dyn WhoisTransport>, options: QueryOptions) -> Self {
        Self { transport, options }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Look up a domain, IP address, or ASN.
    ///
    /// Never fails: every error is folded into [`WhoisResult::Failure`] with
    /// its message. Use [`lookup`](Self::lookup) to keep the typed error.
    pub async fn query(&self, resource: &str) -> WhoisResult {
        let result = self.lookup(resource).await;
        if let Err(e) = &result {
            if e.is_expected() {
                warn!("[WHOIS] Query for '{}' failed: {e}", resource.trim());
            } else {
                error!("[WHOIS] Query for '{}' failed: {e}", resource.trim());
            }
        }
        result.into()
    }

    /// Look up a domain, IP address, or ASN, keeping the typed error.
    pub async fn lookup(&self, resource: &str) -> LookupResult<WhoisRecord> {
        let resource = normalize_resource(resource)?;
        let kind = classify(&resource);
        debug!("[WHOIS] '{resource}' classified as {kind}");

        match kind {
            ResourceKind::IpAddress => {
                let ip = resource.parse::<IpAddr>().map_err(|e| {
                    LookupError::ValidationError(format!("Invalid IP address: {e}"))
                })?;
                self.query_ip(ip).await
            }
            ResourceKind::Asn => self.query_asn(&resource).await,
            ResourceKind::Domain => self.query_domain(&resource).await,
        }
    }

    /// Domain lookup following registry referrals.
    pub async fn query_domain(&self, domain: &str) -> LookupResult<WhoisRecord> {
        let domain = domain_to_ascii(&normalize_resource(domain)?);
        whois::query_domain(self.transport.as_ref(), &domain, &self.options).await
    }

    /// IP address lookup against the responsible regional registry.
    pub async fn query_ip(&self, ip: IpAddr) -> LookupResult<WhoisRecord> {
        whois::query_ip(self.transport.as_ref(), ip, &self.options).await
    }

    /// ASN lookup. `asn` may carry an `AS`/`ASN` prefix; a malformed value
    /// fails with "Invalid ASN format" before any network call.
    pub async fn query_asn(&self, asn: &str) -> LookupResult<WhoisRecord> {
        let asn = parse_asn(asn)?;
        whois::query_asn(self.transport.as_ref(), asn, &self.options).await
    }
}
