use serde::{Deserialize, Serialize};

/// Label prefix reserved for transport-internal metadata fields.
///
/// Pass-through fields whose label starts with this prefix are never rendered
/// back as `label: value` lines.
pub const INTERNAL_FIELD_PREFIX: &str = "__";

/// Default root registry consulted to discover TLD registries and RIRs.
pub const DEFAULT_ROOT_SERVER: &str = "whois.iana.org";
/// Well-known WHOIS port.
pub const DEFAULT_WHOIS_PORT: u16 = 43;
/// Default cap on a single WHOIS response (1 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============ Server records ============

/// Value of a pass-through field in a [`ServerRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Label seen once.
    Single(String),
    /// Label seen several times, values in response order.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// All values in order, whether the field is single or multi-valued.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
        };
        slice.iter().map(String::as_str)
    }

    /// First value of the field.
    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multiple(vec![first, value]);
            }
            Self::Multiple(vs) => vs.push(value),
        }
    }
}

/// One WHOIS server's answer.
///
/// The reserved metadata (`raw`, `comments`, `error`, `source`) is typed; every
/// other `label: value` pair in the response lands in `fields`, in the order
/// the labels first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Full response text exactly as received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Comment lines (`%` / `#`), without their marker.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    /// Server-side failure such as "no match", reserved name or rate limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Registry that produced the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Pass-through fields.
    #[serde(default)]
    pub fields: Vec<(String, FieldValue)>,
}

impl ServerRecord {
    /// Record carrying only a raw response.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Record carrying only a server-side error.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Append a value under `label`, turning the field into a sequence on repeats.
    ///
    /// Labels are matched exactly; the first spelling seen is kept.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        if let Some((_, existing)) = self.fields.iter_mut().find(|(l, _)| *l == label) {
            existing.push(value);
        } else {
            self.fields.push((label, FieldValue::Single(value)));
        }
    }

    /// Look up a field by label, ignoring ASCII case.
    pub fn get(&self, label: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(l, _)| l.eq_ignore_ascii_case(label))
            .map(|(_, v)| v)
    }
}

/// Records keyed by server, in query order.
///
/// The first entry is the registry queried first; every referral target is
/// appended after the server that named it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerResponseMap {
    entries: Vec<(String, ServerRecord)>,
}

impl ServerResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a server's record. A server already present keeps its original position.
    pub fn push(&mut self, server: impl Into<String>, record: ServerRecord) {
        let server = server.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(s, _)| *s == server) {
            *existing = record;
        } else {
            self.entries.push((server, record));
        }
    }

    /// The primary response: the first hop in referral order.
    pub fn primary(&self) -> Option<(&str, &ServerRecord)> {
        self.entries.first().map(|(s, r)| (s.as_str(), r))
    }

    pub fn get(&self, server: &str) -> Option<&ServerRecord> {
        self.entries
            .iter()
            .find(|(s, _)| s == server)
            .map(|(_, r)| r)
    }

    pub fn contains(&self, server: &str) -> bool {
        self.get(server).is_some()
    }

    /// Server identifiers in query order.
    pub fn servers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServerRecord)> {
        self.entries.iter().map(|(s, r)| (s.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ServerRecord)> for ServerResponseMap {
    fn from_iter<I: IntoIterator<Item = (String, ServerRecord)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (server, record) in iter {
            map.push(server, record);
        }
        map
    }
}

// ============ Configuration ============

/// Transport configuration.
///
/// Every field has a default, so a host can deserialize a partial JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportConfig {
    /// Root registry used to discover TLD registries and RIRs.
    pub root_server: String,
    /// TCP port used for every server.
    pub port: u16,
    /// Responses larger than this are rejected.
    pub max_response_bytes: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            root_server: DEFAULT_ROOT_SERVER.to_string(),
            port: DEFAULT_WHOIS_PORT,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}
