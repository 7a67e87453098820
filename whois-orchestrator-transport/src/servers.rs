//! Well-known registries and per-server query syntax.

use std::net::IpAddr;

pub const ARIN_SERVER: &str = "whois.arin.net";
pub const DENIC_SERVER: &str = "whois.denic.de";

/// Registry used for addresses and ASNs when the root server names none.
pub const FALLBACK_RIR_SERVER: &str = ARIN_SERVER;

/// What is being asked, so each server can get its own query syntax.
#[derive(Debug, Clone, Copy)]
pub enum QueryTarget<'a> {
    Domain(&'a str),
    Ip(IpAddr),
    Asn(u32),
}

/// Build the query line sent to `server` (without the trailing CRLF).
pub fn format_query(server: &str, target: QueryTarget<'_>) -> String {
    let server = server.to_ascii_lowercase();
    match target {
        QueryTarget::Domain(domain) if server == DENIC_SERVER => format!("-T dn,ace {domain}"),
        QueryTarget::Domain(domain) => domain.to_string(),
        QueryTarget::Ip(ip) if server == ARIN_SERVER => format!("n + {ip}"),
        QueryTarget::Ip(ip) => ip.to_string(),
        QueryTarget::Asn(asn) if server == ARIN_SERVER => format!("a + {asn}"),
        // RPSL registries (RIPE, APNIC, AFRINIC, LACNIC) want the object name
        QueryTarget::Asn(asn) => format!("AS{asn}"),
    }
}

/// Query sent to the root server to discover who is responsible for `target`.
pub fn discovery_query(target: QueryTarget<'_>) -> String {
    match target {
        QueryTarget::Domain(domain) => tld_of(domain).to_string(),
        QueryTarget::Ip(ip) => ip.to_string(),
        QueryTarget::Asn(asn) => format!("AS{asn}"),
    }
}

/// Last label of a domain name, ignoring a trailing root dot.
pub fn tld_of(domain: &str) -> &str {
    let domain = domain.trim_end_matches('.');
    domain.rsplit('.').next().unwrap_or(domain)
}
