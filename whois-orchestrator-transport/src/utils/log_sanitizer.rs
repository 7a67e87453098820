//! Log sanitization utilities
//!
//! WHOIS responses run to tens of kilobytes of legal boilerplate and contact
//! data; only a bounded summary of the data lines is ever written to logs.

/// Bytes of response data a summary may hold.
const LOG_BYTE_BUDGET: usize = 256;
const SEPARATOR: &str = " | ";

/// Longest prefix of `s` that fits in `max` bytes and ends on a char boundary.
fn prefix_within(s: &str, max: usize) -> &str {
    let end = s
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|&end| end <= max)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Condense a raw WHOIS response into one log line.
///
/// Blank lines and `%`/`#` banner lines are dropped. Whole data lines are
/// kept, joined with ` | `, while they fit in `LOG_BYTE_BUDGET` bytes; the
/// rest is reported as a line count and the total response size. A first
/// line longer than the budget is cut on a char boundary.
pub fn summarize_for_log(raw: &str) -> String {
    let mut lines = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(['%', '#']));
    let mut summary = String::new();

    while let Some(line) = lines.next() {
        let separator = if summary.is_empty() { "" } else { SEPARATOR };
        if summary.len() + separator.len() + line.len() <= LOG_BYTE_BUDGET {
            summary.push_str(separator);
            summary.push_str(line);
            continue;
        }

        let mut omitted = lines.count();
        if summary.is_empty() {
            summary.push_str(prefix_within(line, LOG_BYTE_BUDGET));
            summary.push_str("...");
        } else {
            omitted += 1;
        }
        return format!("{summary} [+{omitted} lines, {} bytes]", raw.len());
    }

    summary
}
