//! WHOIS query strategies, one per resource kind.
//!
//! Each strategy issues its transport call, picks the primary record, and
//! runs it through extraction and normalization. All failures come back as
//! [`LookupError`]; nothing here panics or leaves a query hanging.

use std::future::Future;
use std::net::IpAddr;
use std::time::Duration;

use log::{debug, warn};
use tokio::time::timeout;
use whois_orchestrator_transport::{ServerRecord, TransportError, WhoisTransport};

use crate::error::{DOMAIN_NOT_FOUND_MESSAGE, LookupError, LookupResult};
use crate::services::extractor::extract;
use crate::services::normalizer::normalize;
use crate::types::{ParsedWhoisData, QueryOptions, ResourceKind, WhoisRecord};

/// Round trips an IP or ASN query may take: root server, RIR, one redirect.
const RIR_ROUND_TRIPS: u32 = 3;

/// Domain strategy.
///
/// The transport walks root server → TLD registry → referrals. The primary
/// response is the first hop in referral order (the TLD registry); later hops
/// only matter to the transport. An error on the primary record fails the
/// query even when a registrar answered.
pub async fn query_domain(
    transport: &dyn WhoisTransport,
    domain: &str,
    options: &QueryOptions,
) -> LookupResult<WhoisRecord> {
    debug!(
        "[WHOIS] Domain query for {domain} via {} (follow={})",
        transport.id(),
        options.follow
    );
    // root server + TLD registry + one round trip per referral hop
    let round_trips = u32::from(options.follow) + 2;
    let responses = guarded(
        transport.query_domain(domain, options.timeout(), options.follow),
        deadline(options, round_trips),
    )
    .await?;

    let Some((server, record)) = responses.primary() else {
        return Err(LookupError::NotFound(DOMAIN_NOT_FOUND_MESSAGE.to_string()));
    };
    debug!(
        "[WHOIS] {domain}: {} response(s), primary {server}",
        responses.len()
    );
    if let Some(error) = &record.error {
        return Err(LookupError::ServerReported(error.clone()));
    }

    let (raw, _) = extract(record);
    Ok(build_record(ResourceKind::Domain, raw, server.to_string()))
}

/// IP strategy: one query against the responsible regional registry.
pub async fn query_ip(
    transport: &dyn WhoisTransport,
    ip: IpAddr,
    options: &QueryOptions,
) -> LookupResult<WhoisRecord> {
    debug!("[WHOIS] IP query for {ip} via {}", transport.id());
    let record = guarded(
        transport.query_ip(ip, options.timeout()),
        deadline(options, RIR_ROUND_TRIPS),
    )
    .await?;
    finish_single(ResourceKind::IpAddress, &record)
}

/// ASN strategy: `asn` is already validated and parsed.
pub async fn query_asn(
    transport: &dyn WhoisTransport,
    asn: u32,
    options: &QueryOptions,
) -> LookupResult<WhoisRecord> {
    debug!("[WHOIS] ASN query for AS{asn} via {}", transport.id());
    let record = guarded(
        transport.query_asn(asn, options.timeout()),
        deadline(options, RIR_ROUND_TRIPS),
    )
    .await?;
    finish_single(ResourceKind::Asn, &record)
}

fn finish_single(kind: ResourceKind, record: &ServerRecord) -> LookupResult<WhoisRecord> {
    if let Some(error) = &record.error {
        return Err(LookupError::ServerReported(error.clone()));
    }
    let (raw, server) = extract(record);
    Ok(build_record(kind, raw, server))
}

fn build_record(kind: ResourceKind, data: String, server: String) -> WhoisRecord {
    let parsed = normalize(&data);
    WhoisRecord {
        kind,
        data,
        server,
        parsed: (!parsed.is_empty()).then_some(parsed),
    }
}

/// Overall bound for a call of `round_trips` round trips.
///
/// `None` when the product does not fit in a `Duration`; such a bound could
/// never fire, so the per-attempt timeouts are left to do the work.
fn deadline(options: &QueryOptions, round_trips: u32) -> Option<Duration> {
    options.timeout().checked_mul(round_trips)
}

/// Bound a whole transport call, on top of the transport's per-attempt timeouts.
async fn guarded<T, F>(call: F, deadline: Option<Duration>) -> LookupResult<T>
where
    F: Future<Output = Result<T, TransportError>>,
{
    let Some(deadline) = deadline else {
        return call.await.map_err(LookupError::from);
    };
    match timeout(deadline, call).await {
        Ok(result) => result.map_err(LookupError::from),
        Err(_) => {
            warn!("[WHOIS] Lookup cut off after {deadline:?}");
            Err(LookupError::DeadlineExceeded(deadline.as_secs_f64()))
        }
    }
}

/// Fields recognized in a record's raw view; exposed for hosts that hold a record already.
pub fn parse_record(record: &ServerRecord) -> ParsedWhoisData {
    normalize(&extract(record).0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCall, MockWhoisTransport, domain_map, record};
    use whois_orchestrator_transport::ServerResponseMap;

    fn options() -> QueryOptions {
        QueryOptions::default()
    }

    // ==================== domain strategy tests ====================

    #[tokio::test]
    async fn test_query_domain_uses_first_hop_as_primary() {
        let transport = MockWhoisTransport::new().with_domain(domain_map(&[
            (
                "whois.verisign-grs.com",
                "Domain Name: EXAMPLE.COM\nRegistrar: Registry View\nName Server: A.IANA-SERVERS.NET\n",
            ),
            ("whois.registrar.example", "Domain Name: example.com\nRegistrar: Registrar View\n"),
        ]));

        let result = query_domain(&transport, "example.com", &options()).await.unwrap();

        assert_eq!(result.kind, ResourceKind::Domain);
        assert_eq!(result.server, "whois.verisign-grs.com");
        assert!(result.data.contains("Registry View"));
        let parsed = result.parsed.unwrap();
        assert_eq!(parsed.registrar.as_deref(), Some("Registry View"));
        assert_eq!(parsed.name_servers, vec!["A.IANA-SERVERS.NET"]);
    }

    #[tokio::test]
    async fn test_query_domain_passes_timeout_and_follow() {
        let transport = MockWhoisTransport::new()
            .with_domain(domain_map(&[("whois.nic.example", "Domain Name: X.EXAMPLE")]));
        let options = QueryOptions::default().with_timeout_secs(4).with_follow(1);

        query_domain(&transport, "x.example", &options).await.unwrap();

        assert_eq!(
            transport.calls().await,
            vec![MockCall::Domain {
                domain: "x.example".to_string(),
                timeout: Duration::from_secs(4),
                follow: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_query_domain_empty_map_is_not_found() {
        let transport = MockWhoisTransport::new().with_domain(domain_map(&[]));

        let err = query_domain(&transport, "nothing.invalid", &options())
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::NotFound(_)));
        assert_eq!(err.to_string(), "No WHOIS data found for this domain");
    }

    #[tokio::test]
    async fn test_query_domain_primary_error_does_not_fall_back() {
        let mut map = ServerResponseMap::new();
        map.push(
            "whois.verisign-grs.com",
            ServerRecord::from_error("No match for \"EXAMPLE.COM\"."),
        );
        map.push("whois.registrar.example", record("Domain Name: example.com\n"));
        let transport = MockWhoisTransport::new().with_domain(map);

        let err = query_domain(&transport, "example.com", &options())
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::ServerReported(_)));
        assert_eq!(err.to_string(), "No match for \"EXAMPLE.COM\".");
    }

    #[tokio::test]
    async fn test_query_domain_transport_error_preserved() {
        let transport = MockWhoisTransport::new().with_domain_error(TransportError::NetworkError {
            server: "whois.verisign-grs.com".to_string(),
            detail: "connection refused".to_string(),
        });

        let err = query_domain(&transport, "example.com", &options())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "[whois.verisign-grs.com] Network error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_query_domain_unrecognized_text_has_no_parsed_data() {
        let transport = MockWhoisTransport::new()
            .with_domain(domain_map(&[("whois.nic.example", "Registrant Country: US\n")]));

        let result = query_domain(&transport, "x.example", &options()).await.unwrap();

        assert!(result.parsed.is_none());
        assert_eq!(result.data, "Registrant Country: US\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_domain_hung_transport_times_out() {
        let transport = MockWhoisTransport::new().hanging();
        let options = QueryOptions::default().with_timeout_secs(2).with_follow(2);

        let err = query_domain(&transport, "example.com", &options)
            .await
            .unwrap_err();

        assert!(matches!(err, LookupError::DeadlineExceeded(_)));
        assert_eq!(err.to_string(), "WHOIS lookup did not complete within 8s");
    }

    // ==================== IP / ASN strategy tests ====================

    #[tokio::test]
    async fn test_query_ip_uses_source_label() {
        let mut rec = record("inetnum: 193.0.0.0 - 193.0.7.255\nnetname: RIPE-NCC\n");
        rec.source = Some("RIPE".to_string());
        let transport = MockWhoisTransport::new().with_ip(rec);
        let ip: IpAddr = "193.0.6.139".parse().unwrap();

        let result = query_ip(&transport, ip, &options()).await.unwrap();

        assert_eq!(result.kind, ResourceKind::IpAddress);
        assert_eq!(result.server, "RIPE");
        assert!(result.data.contains("RIPE-NCC"));
        assert_eq!(transport.calls().await, vec![MockCall::Ip(ip)]);
    }

    #[tokio::test]
    async fn test_query_ip_without_source_uses_fallback_label() {
        let transport = MockWhoisTransport::new().with_ip(record("NetRange: 8.8.8.0 - 8.8.8.255\n"));
        let ip: IpAddr = "8.8.8.8".parse().unwrap();

        let result = query_ip(&transport, ip, &options()).await.unwrap();

        assert_eq!(result.server, "IANA WHOIS");
    }

    #[tokio::test]
    async fn test_query_ip_server_error() {
        let transport = MockWhoisTransport::new().with_ip(ServerRecord::from_error("no entries found"));
        let ip: IpAddr = "192.0.2.1".parse().unwrap();

        let err = query_ip(&transport, ip, &options()).await.unwrap_err();

        assert_eq!(err.to_string(), "no entries found");
    }

    #[tokio::test]
    async fn test_query_asn_synthesized_raw_is_parsed() {
        let mut rec = ServerRecord::default();
        rec.insert("aut-num", "AS3333");
        rec.insert("status", "ASSIGNED");
        let transport = MockWhoisTransport::new().with_asn(rec);

        let result = query_asn(&transport, 3333, &options()).await.unwrap();

        assert_eq!(result.kind, ResourceKind::Asn);
        assert_eq!(result.data, "aut-num: AS3333\nstatus: ASSIGNED");
        assert_eq!(result.parsed.unwrap().status, vec!["ASSIGNED"]);
        assert_eq!(transport.calls().await, vec![MockCall::Asn(3333)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_asn_hung_transport_times_out() {
        let transport = MockWhoisTransport::new().hanging();

        let err = query_asn(&transport, 15169, &options()).await.unwrap_err();

        assert_eq!(err.to_string(), "WHOIS lookup did not complete within 30s");
    }

    // ==================== deadline tests ====================

    #[test]
    fn test_deadline_scales_with_round_trips() {
        let options = QueryOptions::default().with_timeout_secs(10);
        assert_eq!(deadline(&options, 4), Some(Duration::from_secs(40)));
        assert_eq!(deadline(&options.with_timeout_secs(0), 3), Some(Duration::ZERO));
    }

    #[test]
    fn test_deadline_overflow_is_unbounded() {
        let options = QueryOptions::default().with_timeout_secs(u64::MAX);
        assert_eq!(deadline(&options, 3), None);
    }

    #[tokio::test]
    async fn test_huge_timeout_from_json_does_not_panic() {
        let options: QueryOptions =
            serde_json::from_str(r#"{"timeoutSecs": 9223372036854775807}"#).unwrap();
        let transport = MockWhoisTransport::new()
            .with_domain(domain_map(&[("whois.nic.example", "Domain Name: X.EXAMPLE\n")]))
            .with_ip(record("NetRange: 192.0.2.0 - 192.0.2.255\n"))
            .with_asn(record("aut-num: AS64496\n"));

        let domain = query_domain(&transport, "x.example", &options).await.unwrap();
        let ip = query_ip(&transport, "192.0.2.1".parse().unwrap(), &options)
            .await
            .unwrap();
        let asn = query_asn(&transport, 64496, &options).await.unwrap();

        assert_eq!(domain.server, "whois.nic.example");
        assert_eq!(ip.kind, ResourceKind::IpAddress);
        assert_eq!(asn.kind, ResourceKind::Asn);
    }

    #[tokio::test]
    async fn test_zero_timeout_still_returns_ready_answer() {
        let options = QueryOptions::default().with_timeout_secs(0);
        let transport = MockWhoisTransport::new()
            .with_domain(domain_map(&[("whois.nic.example", "Domain Name: X.EXAMPLE\n")]));

        let result = query_domain(&transport, "x.example", &options).await.unwrap();

        assert_eq!(result.server, "whois.nic.example");
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_timeout_cuts_off_pending_transport() {
        let options = QueryOptions::default().with_timeout_secs(0);
        let transport = MockWhoisTransport::new().hanging();

        let err = query_ip(&transport, "192.0.2.1".parse().unwrap(), &options)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "WHOIS lookup did not complete within 0s");
    }

    #[test]
    fn test_parse_record() {
        let parsed = parse_record(&record("Domain Name: EXAMPLE.NET\nDNSSEC: unsigned\n"));
        assert_eq!(parsed.domain_name.as_deref(), Some("EXAMPLE.NET"));
        assert_eq!(parsed.dnssec.as_deref(), Some("unsigned"));
    }
}
