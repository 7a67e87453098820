//! Raw view of a server record.

use whois_orchestrator_transport::{INTERNAL_FIELD_PREFIX, ServerRecord};

/// Server label used when a record does not name its source.
pub const FALLBACK_SERVER_LABEL: &str = "IANA WHOIS";

/// Produce `(raw text, server label)` for a record.
///
/// A non-empty raw response is returned verbatim. Otherwise one
/// `label: value` line is synthesized per value, in field order, so a raw
/// view exists even for transports that only return structured data.
pub fn extract(record: &ServerRecord) -> (String, String) {
    let raw = match record.raw.as_deref() {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => synthesize_raw(record),
    };
    let server = record
        .source
        .clone()
        .unwrap_or_else(|| FALLBACK_SERVER_LABEL.to_string());
    (raw, server)
}

fn synthesize_raw(record: &ServerRecord) -> String {
    record
        .fields
        .iter()
        .filter(|(label, _)| !label.starts_with(INTERNAL_FIELD_PREFIX))
        .flat_map(|(label, value)| value.values().map(move |v| format!("{label}: {v}")))
        .collect::<Vec<_>>()
        .join("\n")
}
