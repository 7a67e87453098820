//! Field normalization: raw WHOIS text → [`ParsedWhoisData`].
//!
//! Registries disagree on almost every label, so recognition is driven by one
//! alias table ([`FIELD_ALIASES`]) rather than per-registry parsing code.
//! Anything not in the table stays visible only in the raw text.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::types::ParsedWhoisData;

/// Canonical fields of [`ParsedWhoisData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    DomainName,
    Registrar,
    RegistrarUrl,
    CreationDate,
    ExpiryDate,
    UpdatedDate,
    Status,
    NameServers,
    Dnssec,
}

impl CanonicalField {
    /// Multi-valued fields collect every occurrence; scalars keep the first.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::Status | Self::NameServers)
    }
}

/// Registry label spellings, already in normalized form (lower case, single spaces).
pub const FIELD_ALIASES: &[(&str, CanonicalField)] = &[
    // Domain name
    ("domain name", CanonicalField::DomainName),
    ("domain", CanonicalField::DomainName),
    ("domainname", CanonicalField::DomainName),
    ("domain_name", CanonicalField::DomainName),
    // Registrar
    ("registrar", CanonicalField::Registrar),
    ("registrar name", CanonicalField::Registrar),
    ("sponsoring registrar", CanonicalField::Registrar),
    ("registrar organization", CanonicalField::Registrar),
    ("registrar-name", CanonicalField::Registrar),
    ("authorized agency", CanonicalField::Registrar),
    // Registrar URL
    ("registrar url", CanonicalField::RegistrarUrl),
    ("registrar website", CanonicalField::RegistrarUrl),
    ("registrar web", CanonicalField::RegistrarUrl),
    ("referral url", CanonicalField::RegistrarUrl),
    ("registrar-url", CanonicalField::RegistrarUrl),
    // Creation date
    ("creation date", CanonicalField::CreationDate),
    ("created", CanonicalField::CreationDate),
    ("created date", CanonicalField::CreationDate),
    ("created on", CanonicalField::CreationDate),
    ("registered", CanonicalField::CreationDate),
    ("registered on", CanonicalField::CreationDate),
    ("registration date", CanonicalField::CreationDate),
    ("registration time", CanonicalField::CreationDate),
    ("domain registration date", CanonicalField::CreationDate),
    ("domain create date", CanonicalField::CreationDate),
    ("record created", CanonicalField::CreationDate),
    // Expiry date
    ("registry expiry date", CanonicalField::ExpiryDate),
    ("registrar registration expiration date", CanonicalField::ExpiryDate),
    ("expiration date", CanonicalField::ExpiryDate),
    ("expiry date", CanonicalField::ExpiryDate),
    ("expiration time", CanonicalField::ExpiryDate),
    ("expire date", CanonicalField::ExpiryDate),
    ("expires", CanonicalField::ExpiryDate),
    ("expires on", CanonicalField::ExpiryDate),
    ("paid-till", CanonicalField::ExpiryDate),
    ("domain expiration date", CanonicalField::ExpiryDate),
    ("record expires on", CanonicalField::ExpiryDate),
    // Updated date
    ("updated date", CanonicalField::UpdatedDate),
    ("updated", CanonicalField::UpdatedDate),
    ("last updated", CanonicalField::UpdatedDate),
    ("last update", CanonicalField::UpdatedDate),
    ("last modified", CanonicalField::UpdatedDate),
    ("last-modified", CanonicalField::UpdatedDate),
    ("last-update", CanonicalField::UpdatedDate),
    ("modified", CanonicalField::UpdatedDate),
    ("changed", CanonicalField::UpdatedDate),
    ("domain last updated date", CanonicalField::UpdatedDate),
    // Status
    ("domain status", CanonicalField::Status),
    ("status", CanonicalField::Status),
    ("state", CanonicalField::Status),
    ("registration status", CanonicalField::Status),
    ("domain state", CanonicalField::Status),
    // Name servers
    ("name server", CanonicalField::NameServers),
    ("name servers", CanonicalField::NameServers),
    ("nameserver", CanonicalField::NameServers),
    ("nameservers", CanonicalField::NameServers),
    ("nserver", CanonicalField::NameServers),
    ("name server handle", CanonicalField::NameServers),
    ("hostname", CanonicalField::NameServers),
    ("dns", CanonicalField::NameServers),
    // DNSSEC
    ("dnssec", CanonicalField::Dnssec),
    ("dnssec status", CanonicalField::Dnssec),
    ("signed", CanonicalField::Dnssec),
];

static ALIAS_INDEX: LazyLock<HashMap<&'static str, CanonicalField>> =
    LazyLock::new(|| FIELD_ALIASES.iter().copied().collect());

/// Lower-case a label and collapse runs of whitespace into single spaces.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Canonical field for a raw label, if the alias table knows it.
pub fn lookup_alias(label: &str) -> Option<CanonicalField> {
    ALIAS_INDEX.get(normalize_label(label).as_str()).copied()
}

/// Parse raw WHOIS text into recognized fields.
///
/// Never fails: text with no recognizable line yields an empty record.
pub fn normalize(raw: &str) -> ParsedWhoisData {
    let mut parsed = ParsedWhoisData::default();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') || line.starts_with('#') {
            continue;
        }
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let Some(field) = lookup_alias(label) else {
            continue;
        };
        apply(&mut parsed, field, value);
    }

    parsed
}

fn apply(parsed: &mut ParsedWhoisData, field: CanonicalField, value: &str) {
    let slot = match field {
        CanonicalField::Status => return push_unique(&mut parsed.status, value),
        CanonicalField::NameServers => return push_unique(&mut parsed.name_servers, value),
        CanonicalField::DomainName => &mut parsed.domain_name,
        CanonicalField::Registrar => &mut parsed.registrar,
        CanonicalField::RegistrarUrl => &mut parsed.registrar_url,
        CanonicalField::CreationDate => &mut parsed.creation_date,
        CanonicalField::ExpiryDate => &mut parsed.expiry_date,
        CanonicalField::UpdatedDate => &mut parsed.updated_date,
        CanonicalField::Dnssec => &mut parsed.dnssec,
    };
    // registries repeat fields across referral hops; the first occurrence is kept
    if slot.is_none() {
        *slot = Some(value.to_string());
    }
}

/// Append unless an entry equal ignoring case is already present.
fn push_unique(values: &mut Vec<String>, value: &str) {
    let lower = value.to_lowercase();
    if !values.iter().any(|v| v.to_lowercase() == lower) {
        values.push(value.to_string());
    }
}
