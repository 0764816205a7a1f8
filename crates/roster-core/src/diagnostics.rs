use serde::Serialize;
use tracing::{debug, warn};

/// How much a diagnostic affected the result it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The document or entry was dropped.
    Skip,
    /// The record was kept but some value was replaced by a default.
    Warning,
    Info,
}

/// A single non-fatal problem found while scanning or parsing.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Where the problem was found: a file path, or `path#N` for a log entry.
    pub source: String,
    pub severity: Severity,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            Severity::Skip => "⏭️ ",
            Severity::Warning => "⚠️ ",
            Severity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.source, self.message)
    }
}

/// Collector returned alongside every scan and parse.
///
/// Each recorded diagnostic is also emitted as a `tracing` event so that a
/// subscriber sees the same information without inspecting the collector.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` was dropped from the result.
    pub fn skip(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let source = source.into();
        let message = message.into();
        warn!(source = %source, reason = %message, "skipped");
        self.entries.push(Diagnostic {
            source,
            severity: Severity::Skip,
            message,
        });
    }

    pub fn warn(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let source = source.into();
        let message = message.into();
        warn!(source = %source, "{}", message);
        self.entries.push(Diagnostic {
            source,
            severity: Severity::Warning,
            message,
        });
    }

    pub fn info(&mut self, source: impl Into<String>, message: impl Into<String>) {
        let source = source.into();
        let message = message.into();
        debug!(source = %source, "{}", message);
        self.entries.push(Diagnostic {
            source,
            severity: Severity::Info,
            message,
        });
    }

    /// Move every diagnostic from `other` into `self`.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of dropped documents or entries.
    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| d.severity == Severity::Skip)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
