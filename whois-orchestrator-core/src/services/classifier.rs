//! Resource classification: IP literal, ASN, or domain.

use std::net::IpAddr;

use crate::error::{INVALID_ASN_MESSAGE, LookupError, LookupResult};
use crate::types::ResourceKind;

/// Classify a non-empty, trimmed query string.
///
/// IP literals are checked first so dotted-quad strings never reach the ASN
/// test. Anything that is neither falls through to [`ResourceKind::Domain`];
/// domain syntax is left for the registry to reject.
pub fn classify(input: &str) -> ResourceKind {
    if input.parse::<IpAddr>().is_ok() {
        ResourceKind::IpAddress
    } else if is_asn(input) {
        ResourceKind::Asn
    } else {
        ResourceKind::Domain
    }
}

/// `AS`/`ASN` prefix (any case) stripped, if present.
fn strip_asn_prefix(input: &str) -> &str {
    let bytes = input.as_bytes();
    let prefix_len = if bytes.len() >= 3 && bytes[..3].eq_ignore_ascii_case(b"asn") {
        3
    } else if bytes.len() >= 2 && bytes[..2].eq_ignore_ascii_case(b"as") {
        2
    } else {
        0
    };
    &input[prefix_len..]
}

/// `^(as|asn)?[0-9]+$`, case-insensitive.
fn is_asn(input: &str) -> bool {
    let digits = strip_asn_prefix(input);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an ASN string into the number sent to the registry.
///
/// Fails with "Invalid ASN format" for anything other than an optional prefix
/// followed by digits that fit in 32 bits.
pub fn parse_asn(input: &str) -> LookupResult<u32> {
    let digits = strip_asn_prefix(input.trim());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LookupError::ValidationError(INVALID_ASN_MESSAGE.to_string()));
    }
    digits
        .parse::<u32>()
        .map_err(|_| LookupError::ValidationError(INVALID_ASN_MESSAGE.to_string()))
}
