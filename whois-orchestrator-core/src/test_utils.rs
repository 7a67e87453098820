//! Test doubles for the WHOIS transport.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use whois_orchestrator_transport::{
    Result, ServerRecord, ServerResponseMap, TransportError, WhoisTransport,
};

/// A call received by [`MockWhoisTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Domain {
        domain: String,
        timeout: Duration,
        follow: u8,
    },
    Ip(IpAddr),
    Asn(u32),
}

/// Canned reply for one query kind.
#[derive(Debug, Clone)]
enum Reply<T> {
    Respond(T),
    Fail(TransportError),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Self::Respond(value) => Ok(value.clone()),
            Self::Fail(e) => Err(e.clone()),
        }
    }
}

/// Transport returning canned replies and recording every call.
///
/// Unconfigured query kinds fail with a network error.
pub struct MockWhoisTransport {
    domain: Reply<ServerResponseMap>,
    ip: Reply<ServerRecord>,
    asn: Reply<ServerRecord>,
    hang: bool,
    calls: RwLock<Vec<MockCall>>,
}

impl Default for MockWhoisTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWhoisTransport {
    pub fn new() -> Self {
        let unconfigured = TransportError::NetworkError {
            server: "mock".to_string(),
            detail: "no reply configured".to_string(),
        };
        Self {
            domain: Reply::Fail(unconfigured.clone()),
            ip: Reply::Fail(unconfigured.clone()),
            asn: Reply::Fail(unconfigured),
            hang: false,
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_domain(mut self, responses: ServerResponseMap) -> Self {
        self.domain = Reply::Respond(responses);
        self
    }

    pub fn with_domain_error(mut self, error: TransportError) -> Self {
        self.domain = Reply::Fail(error);
        self
    }

    pub fn with_ip(mut self, record: ServerRecord) -> Self {
        self.ip = Reply::Respond(record);
        self
    }

    pub fn with_ip_error(mut self, error: TransportError) -> Self {
        self.ip = Reply::Fail(error);
        self
    }

    pub fn with_asn(mut self, record: ServerRecord) -> Self {
        self.asn = Reply::Respond(record);
        self
    }

    /// Every query records its call, then never completes.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    async fn record_call(&self, call: MockCall) {
        self.calls.write().await.push(call);
        if self.hang {
            std::future::pending::<()>().await;
        }
    }
}

#[async_trait]
impl WhoisTransport for MockWhoisTransport {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn query_domain(
        &self,
        domain: &str,
        timeout: Duration,
        follow: u8,
    ) -> Result<ServerResponseMap> {
        self.record_call(MockCall::Domain {
            domain: domain.to_string(),
            timeout,
            follow,
        })
        .await;
        self.domain.get()
    }

    async fn query_ip(&self, ip: IpAddr, _timeout: Duration) -> Result<ServerRecord> {
        self.record_call(MockCall::Ip(ip)).await;
        self.ip.get()
    }

    async fn query_asn(&self, asn: u32, _timeout: Duration) -> Result<ServerRecord> {
        self.record_call(MockCall::Asn(asn)).await;
        self.asn.get()
    }
}

/// Record holding `raw` as its response text.
pub fn record(raw: &str) -> ServerRecord {
    ServerRecord::from_raw(raw)
}

/// Domain response map in referral order.
pub fn domain_map(entries: &[(&str, &str)]) -> ServerResponseMap {
    entries
        .iter()
        .map(|(server, raw)| ((*server).to_string(), record(raw)))
        .collect()
}
