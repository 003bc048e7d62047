use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A CSP report reduced to the allow-listed fields.
///
/// Values are carried exactly as the client sent them; only the set of keys
/// is constrained. Keys keep the order in which the sanitizer inserted them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizedReport(Map<String, Value>);

impl SanitizedReport {
    pub(crate) fn new() -> Self {
        Self(Map::new())
    }

    pub(crate) fn insert(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    /// Value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// The unit appended to the report log: `{ "csp-report": <report> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedRecord {
    #[serde(rename = "csp-report")]
    pub report: SanitizedReport,
}

impl SanitizedRecord {
    /// Render the record as it is written to the log: 2-space indented JSON
    /// followed by exactly one newline.
    pub fn to_log_entry(&self) -> Result<String, serde_json::Error> {
        let mut entry = serde_json::to_string_pretty(self)?;
        entry.push('\n');
        Ok(entry)
    }
}

impl From<SanitizedReport> for SanitizedRecord {
    fn from(report: SanitizedReport) -> Self {
        Self { report }
    }
}
