//! Utility modules.

/// Condensed views of WHOIS payloads for trace logs.
pub mod log_sanitizer;
