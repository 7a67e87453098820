use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ServerRecord, ServerResponseMap};

/// WHOIS transport capability.
///
/// Implementations decide the wire protocol (port-43 text exchange, RDAP, a
/// test double). Callers only rely on the record shapes.
///
/// `timeout` bounds each network round trip, not the whole operation.
#[async_trait]
pub trait WhoisTransport: Send + Sync {
    /// Transport identifier, used in logs.
    fn id(&self) -> &'static str;

    /// Query the registry chain for a domain.
    ///
    /// The returned map starts with the TLD registry's record; up to `follow`
    /// referral targets are appended in the order they were discovered. An
    /// empty map means no registry holds data for the domain.
    async fn query_domain(
        &self,
        domain: &str,
        timeout: Duration,
        follow: u8,
    ) -> Result<ServerResponseMap>;

    /// Query the regional registry responsible for an address.
    async fn query_ip(&self, ip: IpAddr, timeout: Duration) -> Result<ServerRecord>;

    /// Query the regional registry responsible for an autonomous system.
    async fn query_asn(&self, asn: u32, timeout: Duration) -> Result<ServerRecord>;
}
