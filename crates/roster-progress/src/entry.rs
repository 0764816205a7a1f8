use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Work status of a progress entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Complete,
    InProgress,
    Blocked,
    Failed,
    Paused,
    Planned,
    #[default]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Complete,
        Status::InProgress,
        Status::Blocked,
        Status::Failed,
        Status::Paused,
        Status::Planned,
        Status::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Complete => "complete",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Failed => "failed",
            Status::Paused => "paused",
            Status::Planned => "planned",
            Status::Unknown => "unknown",
        }
    }

    /// Title-cased label, e.g. "In Progress".
    pub fn label(&self) -> &'static str {
        match self {
            Status::Complete => "Complete",
            Status::InProgress => "In Progress",
            Status::Blocked => "Blocked",
            Status::Failed => "Failed",
            Status::Paused => "Paused",
            Status::Planned => "Planned",
            Status::Unknown => "Unknown",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Status::Complete => "✅",
            Status::InProgress => "🔄",
            Status::Blocked => "⚠️",
            Status::Failed => "❌",
            Status::Paused => "🚧",
            Status::Planned => "📋",
            Status::Unknown => "📝",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    /// Accepts the snake_case name, ignoring case and reading spaces or
    /// hyphens as underscores (`"In Progress"` → `InProgress`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

/// Lower-case `key` and fold spaces and hyphens to underscores.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// The layout an entry was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryFormat {
    /// A delimited key/value block.
    Structured,
    /// Markdown prose with labeled fields.
    Narrative,
    /// A structured block followed by narrative prose.
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deliverable {
    pub path: String,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

fn unknown_kind() -> String {
    "unknown".into()
}

impl Deliverable {
    pub fn new(path: impl Into<String>, kind: Option<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: kind.filter(|k| !k.is_empty()).unwrap_or_else(unknown_kind),
            description: description.into(),
        }
    }
}

/// A metric value after best-effort numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Coerce raw text: trailing `%` is dropped, then integer, then finite
    /// float, else the trimmed text is kept.
    pub fn coerce(raw: &str) -> Self {
        let value = raw.trim().trim_end_matches('%').trim_end();
        if let Ok(i) = value.parse::<i64>() {
            return MetricValue::Integer(i);
        }
        match value.parse::<f64>() {
            Ok(f) if f.is_finite() => MetricValue::Float(f),
            _ => MetricValue::Text(value.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(i) => Some(*i as f64),
            MetricValue::Float(f) => Some(*f),
            MetricValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Integer(i) => write!(f, "{i}"),
            MetricValue::Float(x) => write!(f, "{x}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// Metric name → value, in the order the metrics were written.
///
/// Serializes as a map. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics(Vec<(String, MetricValue)>);

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MetricValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&MetricValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Metrics {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Order is not recoverable through a plain map; sorted is good enough
        // for reading exports back.
        let map = BTreeMap::<String, MetricValue>::deserialize(deserializer)?;
        Ok(Metrics(map.into_iter().collect()))
    }
}

impl FromIterator<(String, MetricValue)> for Metrics {
    fn from_iter<I: IntoIterator<Item = (String, MetricValue)>>(iter: I) -> Self {
        let mut metrics = Metrics::new();
        for (k, v) in iter {
            metrics.insert(k, v);
        }
        metrics
    }
}

/// One normalized unit of work-status information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// `YYYY-MM-DD HH:MM` for narrative entries; passed through as written
    /// for structured ones.
    pub timestamp: Option<String>,
    pub agent: Option<String>,
    pub task_id: Option<String>,
    pub task_title: Option<String>,
    #[serde(default)]
    pub status: Status,
    pub duration_minutes: Option<u64>,
    /// Clamped to 100.
    pub progress_percent: Option<u8>,
    #[serde(default)]
    pub deliverables: Vec<Deliverable>,
    #[serde(default)]
    pub metrics: Metrics,
    pub context: Option<String>,
    pub format: EntryFormat,
    /// Structured keys with no dedicated field.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProgressEntry {
    pub fn new(format: EntryFormat) -> Self {
        Self {
            timestamp: None,
            agent: None,
            task_id: None,
            task_title: None,
            status: Status::Unknown,
            duration_minutes: None,
            progress_percent: None,
            deliverables: Vec::new(),
            metrics: Metrics::new(),
            context: None,
            format,
            extra: BTreeMap::new(),
        }
    }

    /// The date part of the timestamp.
    pub fn date(&self) -> Option<&str> {
        self.timestamp
            .as_deref()
            .and_then(|ts| ts.split(|c: char| c == ' ' || c == 'T').next())
            .filter(|d| !d.is_empty())
    }

    pub fn agent_or_unknown(&self) -> &str {
        self.agent.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!("In Progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("in-progress".parse::<Status>(), Ok(Status::InProgress));
        assert_eq!("FAILED".parse::<Status>(), Ok(Status::Failed));
        assert!("done-ish".parse::<Status>().is_err());
    }

    #[test]
    fn metric_coercion_order() {
        assert_eq!(MetricValue::coerce("87%"), MetricValue::Integer(87));
        assert_eq!(MetricValue::coerce(" 92.5 % "), MetricValue::Float(92.5));
        assert_eq!(MetricValue::coerce("n/a"), MetricValue::Text("n/a".into()));
        assert_eq!(MetricValue::coerce("inf"), MetricValue::Text("inf".into()));
    }

    #[test]
    fn metrics_keep_written_order() {
        let mut m = Metrics::new();
        m.insert("zeta", MetricValue::Integer(1));
        m.insert("alpha", MetricValue::Integer(2));
        m.insert("zeta", MetricValue::Integer(3));
        let keys: Vec<_> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(m.get("zeta"), Some(&MetricValue::Integer(3)));
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"zeta":3,"alpha":2}"#);
    }

    #[test]
    fn date_is_first_part_of_timestamp() {
        let mut e = ProgressEntry::new(EntryFormat::Narrative);
        assert_eq!(e.date(), None);
        e.timestamp = Some("2025-01-15 09:00".into());
        assert_eq!(e.date(), Some("2025-01-15"));
        e.timestamp = Some("2025-01-16T10:00:00Z".into());
        assert_eq!(e.date(), Some("2025-01-16"));
    }

    #[test]
    fn deliverable_type_defaults_to_unknown() {
        let d = Deliverable::new("src/lib.rs", None, "");
        assert_eq!(d.kind, "unknown");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "unknown");
    }
}
