//! Port-43 WHOIS transport.
//!
//! Every round trip is one TCP connection: write the query and CRLF, read
//! until the server closes. Registries are discovered through the root
//! server (`whois.iana.org` by default) and referrals are followed hop by hop.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::{Result, TransportError};
use crate::parser::{find_referral, normalize_referral, parse_response};
use crate::servers::{FALLBACK_RIR_SERVER, QueryTarget, discovery_query, format_query};
use crate::traits::WhoisTransport;
use crate::types::{FieldValue, ServerRecord, ServerResponseMap, TransportConfig};
use crate::utils::log_sanitizer::summarize_for_log;

/// WHOIS over TCP.
///
/// Holds configuration only; each query opens its own connections, so a
/// single instance can serve any number of concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct TcpWhoisTransport {
    config: TransportConfig,
}

impl TcpWhoisTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Send one query to one server and return the decoded response.
    ///
    /// `limit` bounds the whole exchange: connect, write and read.
    pub async fn raw_query(&self, server: &str, query: &str, limit: Duration) -> Result<String> {
        if query.trim().is_empty() {
            return Err(TransportError::InvalidQuery {
                detail: "query is empty".to_string(),
            });
        }
        if query.contains(['\r', '\n']) {
            return Err(TransportError::InvalidQuery {
                detail: "query contains a line break".to_string(),
            });
        }

        let addr = format!("{server}:{}", self.config.port);
        let max_bytes = self.config.max_response_bytes;
        debug!("[Transport] {addr} <- {query}");

        let exchange = async {
            let mut stream = TcpStream::connect(&addr)
                .await
                .map_err(|e| TransportError::network(server, e))?;
            stream
                .write_all(format!("{query}\r\n").as_bytes())
                .await
                .map_err(|e| TransportError::network(server, e))?;

            let cap = u64::try_from(max_bytes)
                .unwrap_or(u64::MAX)
                .saturating_add(1);
            let mut reader = stream.take(cap);
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .await
                .map_err(|e| TransportError::network(server, e))?;
            if buf.len() > max_bytes {
                return Err(TransportError::ResponseTooLarge {
                    server: server.to_string(),
                    limit: max_bytes,
                });
            }
            Ok::<_, TransportError>(buf)
        };

        let bytes = timeout(limit, exchange)
            .await
            .map_err(|_| TransportError::Timeout {
                server: server.to_string(),
                timeout_secs: limit.as_secs_f64(),
            })??;

        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!("[Transport] {addr} -> {} bytes", bytes.len());
        trace!("[Transport] {addr} -> {}", summarize_for_log(&text));
        Ok(text)
    }

    /// Ask the root server which registry is responsible for `target`.
    async fn discover(&self, target: QueryTarget<'_>, limit: Duration) -> Result<Option<String>> {
        let root = self.config.root_server.as_str();
        let raw = self.raw_query(root, &discovery_query(target), limit).await?;
        let registry = find_referral(&parse_response(&raw));
        debug!("[Transport] Root server {root} refers {target:?} to {registry:?}");
        Ok(registry)
    }

    async fn query_registry(
        &self,
        server: &str,
        target: QueryTarget<'_>,
        limit: Duration,
    ) -> Result<ServerRecord> {
        let raw = self
            .raw_query(server, &format_query(server, target), limit)
            .await?;
        Ok(parse_response(&raw))
    }

    /// Query the RIR responsible for an address or autonomous system.
    ///
    /// One `ReferralServer` redirect is followed, which is how ARIN hands
    /// out blocks transferred to another region.
    async fn query_rir(&self, target: QueryTarget<'_>, limit: Duration) -> Result<ServerRecord> {
        let rir = self
            .discover(target, limit)
            .await?
            .unwrap_or_else(|| FALLBACK_RIR_SERVER.to_string());

        let mut server = rir.clone();
        let mut record = self.query_registry(&rir, target, limit).await?;

        let redirect = record
            .get("ReferralServer")
            .and_then(FieldValue::first)
            .and_then(normalize_referral);
        if let Some(next) = redirect
            && next != rir
        {
            debug!("[Transport] {rir} redirects {target:?} to {next}");
            match self.query_registry(&next, target, limit).await {
                Ok(redirected) => {
                    record = redirected;
                    server = next;
                }
                Err(e) => warn!("[Transport] Redirect to {next} failed, keeping {rir}: {e}"),
            }
        }

        if record.source.is_none() {
            record.source = Some(server);
        }
        Ok(record)
    }
}

#[async_trait]
impl WhoisTransport for TcpWhoisTransport {
    fn id(&self) -> &'static str {
        "tcp"
    }

    async fn query_domain(
        &self,
        domain: &str,
        timeout: Duration,
        follow: u8,
    ) -> Result<ServerResponseMap> {
        let mut responses = ServerResponseMap::new();
        let target = QueryTarget::Domain(domain);

        let Some(mut server) = self.discover(target, timeout).await? else {
            debug!("[Transport] No registry known for {domain}");
            return Ok(responses);
        };
        let mut remaining = follow;

        loop {
            let record = match self.query_registry(&server, target, timeout).await {
                Ok(record) => record,
                Err(e) if !responses.is_empty() => {
                    warn!(
                        "[Transport] Referral to {server} failed, keeping {} response(s): {e}",
                        responses.len()
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            let next = find_referral(&record);
            responses.push(server.clone(), record);

            if remaining == 0 {
                break;
            }
            match next {
                Some(next) if !responses.contains(&next) => {
                    debug!("[Transport] {server} refers {domain} to {next}");
                    remaining -= 1;
                    server = next;
                }
                _ => break,
            }
        }

        Ok(responses)
    }

    async fn query_ip(&self, ip: IpAddr, timeout: Duration) -> Result<ServerRecord> {
        self.query_rir(QueryTarget::Ip(ip), timeout).await
    }

    async fn query_asn(&self, asn: u32, timeout: Duration) -> Result<ServerRecord> {
        self.query_rir(QueryTarget::Asn(asn), timeout).await
    }
}
