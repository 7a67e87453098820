//! Port-43 response text → [`ServerRecord`].

use regex::Regex;

use crate::types::ServerRecord;

/// Labels that name the next server to ask, in priority order.
const REFERRAL_LABELS: &[&str] = &[
    "Registrar WHOIS Server",
    "Whois Server",
    "ReferralServer",
    "refer",
    "whois",
];

/// Phrases registries open a "no data" or refusal line with. Matched
/// case-insensitively at the start of a colon-less line, ignoring leading
/// punctuation such as `>>>`.
const SERVER_ERROR_PHRASES: &[&str] = &[
    "no match",
    "no matching record",
    "no entries found",
    "no data found",
    "no object found",
    "object does not exist",
    "domain not found",
    "not found",
    "whois limit exceeded",
    "limit exceeded",
    "rate limit exceeded",
    "query rate limit",
    "too many queries",
    "access denied",
];

/// Parse a raw WHOIS response into a record.
///
/// - `%` / `#` lines become comments; RIPE-style `%ERROR:<code>: <msg>` sets `error`.
/// - `label: value` lines become fields, repeats become sequences.
/// - `source:` fills the reserved `source` field instead of a pass-through field.
/// - Colon-less lines opening with a known "no data" phrase set `error`, but
///   only before the first field: after that they are notices and footers.
///
/// The first error line found wins; the raw text is always kept.
pub fn parse_response(raw: &str) -> ServerRecord {
    let mut record = ServerRecord::from_raw(raw);

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('%') || line.starts_with('#') {
            if record.error.is_none() {
                record.error = parse_error_comment(line);
            }
            let comment = line.trim_start_matches(['%', '#']).trim();
            if !comment.is_empty() {
                record.comments.push(comment.to_string());
            }
            continue;
        }

        let Some((label, value)) = line.split_once(':') else {
            if record.error.is_none() && record.fields.is_empty() && is_server_error_line(line) {
                record.error = Some(line.to_string());
            }
            continue;
        };

        let label = label.trim();
        let value = value.trim();
        // `please visit https://...` splits inside the URL scheme
        if label.is_empty() || value.is_empty() || value.starts_with("//") {
            continue;
        }

        if label.eq_ignore_ascii_case("source") {
            if record.source.is_none() {
                record.source = Some(value.to_string());
            }
            continue;
        }

        record.insert(label, value);
    }

    record
}

/// Extract the message of a RIPE-style `%ERROR:101: no entries found` line.
fn parse_error_comment(line: &str) -> Option<String> {
    let re = Regex::new(r"(?i)^%+\s*ERROR:\s*\d*:?\s*(.+)$").ok()?;
    let caps = re.captures(line)?;
    let message = caps.get(1)?.as_str().trim();
    (!message.is_empty()).then(|| message.to_string())
}

fn is_server_error_line(line: &str) -> bool {
    let lower = line
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    SERVER_ERROR_PHRASES
        .iter()
        .any(|phrase| lower.starts_with(phrase))
}

/// Find the next server named by a record, already normalized to a bare host.
pub fn find_referral(record: &ServerRecord) -> Option<String> {
    REFERRAL_LABELS
        .iter()
        .filter_map(|label| record.get(label))
        .flat_map(|value| value.values())
        .find_map(normalize_referral)
}

/// Reduce a referral value to a host name.
///
/// Accepts `host`, `host:port`, `whois://host[:port][/]`. `rwhois://` targets
/// and anything that is not a plain host name yield `None`.
pub fn normalize_referral(value: &str) -> Option<String> {
    let re = Regex::new(r"(?i)^(?:whois://)?([a-z0-9][a-z0-9.-]*[a-z0-9])\.?(?::\d+)?/?$").ok()?;
    let value = value.trim();
    let caps = re.captures(value)?;
    let host = caps.get(1)?.as_str().to_lowercase();
    host.contains('.').then_some(host)
}
