use serde::Serialize;
use std::collections::BTreeMap;

use crate::entry::{ProgressEntry, Status, normalize_key};

/// Metric names read as test coverage, in priority order, after
/// [`normalize_key`].
pub const COVERAGE_ALIASES: &[&str] = &["test_coverage", "test_coverage_percent"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub total_entries: usize,
    pub by_status: BTreeMap<Status, usize>,
    /// Entries without an agent are counted under `unknown`.
    pub by_agent: BTreeMap<String, usize>,
    pub total_duration_minutes: u64,
    pub total_deliverables: usize,
    /// Mean over entries with a numeric coverage metric, one decimal.
    pub avg_test_coverage: Option<f64>,
}

impl ProgressSummary {
    pub fn from_entries(entries: &[ProgressEntry]) -> Self {
        let mut summary = Self {
            total_entries: entries.len(),
            ..Default::default()
        };
        let mut coverage_sum = 0.0;
        let mut coverage_count = 0usize;

        for entry in entries {
            *summary.by_status.entry(entry.status).or_default() += 1;
            *summary
                .by_agent
                .entry(entry.agent_or_unknown().to_string())
                .or_default() += 1;
            summary.total_duration_minutes += entry.duration_minutes.unwrap_or(0);
            summary.total_deliverables += entry.deliverables.len();

            if let Some(coverage) = test_coverage(entry) {
                coverage_sum += coverage;
                coverage_count += 1;
            }
        }

        if coverage_count > 0 {
            let avg = coverage_sum / coverage_count as f64;
            summary.avg_test_coverage = Some((avg * 10.0).round() / 10.0);
        }
        summary
    }

    /// Total duration in hours.
    pub fn total_hours(&self) -> f64 {
        self.total_duration_minutes as f64 / 60.0
    }

    /// Agents with the most entries, ties broken by name.
    pub fn top_agents(&self, n: usize) -> Vec<(&str, usize)> {
        let mut agents: Vec<(&str, usize)> =
            self.by_agent.iter().map(|(a, c)| (a.as_str(), *c)).collect();
        agents.sort_by(|a, b| b.1.cmp(&a.1));
        agents.truncate(n);
        agents
    }
}

/// The entry's test coverage: the first alias present wins, and a
/// non-numeric value means no coverage.
pub fn test_coverage(entry: &ProgressEntry) -> Option<f64> {
    COVERAGE_ALIASES.iter().find_map(|alias| {
        entry
            .metrics
            .iter()
            .find(|(key, _)| normalize_key(key) == *alias)
            .map(|(_, value)| value.as_f64())
    })?
}

/// Conjunction of optional agent, status and date-range conditions.
///
/// Dates compare as `YYYY-MM-DD` strings, bounds inclusive. An entry with no
/// timestamp never matches a date bound.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub agent: Option<String>,
    pub status: Option<Status>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn dates(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.agent.is_none()
            && self.status.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn matches(&self, entry: &ProgressEntry) -> bool {
        if let Some(agent) = &self.agent {
            if entry.agent.as_deref() != Some(agent.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if entry.status != status {
                return false;
            }
        }
        if self.start_date.is_none() && self.end_date.is_none() {
            return true;
        }
        let Some(date) = entry.date() else {
            return false;
        };
        self.start_date.as_deref().is_none_or(|start| date >= start)
            && self.end_date.as_deref().is_none_or(|end| date <= end)
    }

    pub fn apply(&self, entries: Vec<ProgressEntry>) -> Vec<ProgressEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntryFormat, MetricValue};

    fn entry(agent: &str, date: &str, status: Status, minutes: Option<u64>) -> ProgressEntry {
        let mut e = ProgressEntry::new(EntryFormat::Narrative);
        e.agent = Some(agent.into());
        e.timestamp = Some(format!("{date} 09:00"));
        e.status = status;
        e.duration_minutes = minutes;
        e
    }

    #[test]
    fn durations_and_status_counts() {
        let entries = vec![
            entry("a", "2025-01-01", Status::Failed, Some(60)),
            entry("b", "2025-01-02", Status::Failed, Some(0)),
            entry("a", "2025-01-03", Status::Complete, Some(150)),
        ];
        let s = ProgressSummary::from_entries(&entries);
        assert_eq!(s.total_entries, 3);
        assert_eq!(s.total_duration_minutes, 210);
        assert_eq!(s.by_status[&Status::Failed], 2);
        assert_eq!(s.by_status[&Status::Complete], 1);
        assert_eq!(s.top_agents(1), vec![("a", 2)]);
        assert_eq!(s.avg_test_coverage, None);
        assert!((s.total_hours() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn missing_agent_counts_as_unknown() {
        let mut e = ProgressEntry::new(EntryFormat::Structured);
        e.duration_minutes = None;
        let s = ProgressSummary::from_entries(&[e]);
        assert_eq!(s.by_agent["unknown"], 1);
        assert_eq!(s.by_status[&Status::Unknown], 1);
        assert_eq!(s.total_duration_minutes, 0);
    }

    #[test]
    fn coverage_uses_aliases_and_skips_text() {
        let mut a = entry("a", "2025-01-01", Status::Complete, None);
        a.metrics.insert("Test Coverage", MetricValue::Integer(80));
        let mut b = entry("b", "2025-01-01", Status::Complete, None);
        b.metrics.insert("test-coverage-percent", MetricValue::Float(91.25));
        let mut c = entry("c", "2025-01-01", Status::Complete, None);
        c.metrics.insert("test_coverage", MetricValue::Text("pending".into()));
        let d = entry("d", "2025-01-01", Status::Complete, None);

        let s = ProgressSummary::from_entries(&[a, b, c, d]);
        assert_eq!(s.avg_test_coverage, Some(85.6));
    }

    #[test]
    fn first_alias_wins_within_entry() {
        let mut e = entry("a", "2025-01-01", Status::Complete, None);
        e.metrics.insert("test_coverage_percent", MetricValue::Integer(10));
        e.metrics.insert("test_coverage", MetricValue::Integer(90));
        assert_eq!(test_coverage(&e), Some(90.0));
    }

    #[test]
    fn filters_combine() {
        let entries = vec![
            entry("a", "2025-01-01", Status::Complete, None),
            entry("a", "2025-01-05", Status::Failed, None),
            entry("b", "2025-01-03", Status::Complete, None),
            ProgressEntry::new(EntryFormat::Structured),
        ];

        let by_range = EntryFilter::new()
            .dates(Some("2025-01-01".into()), Some("2025-01-03".into()))
            .apply(entries.clone());
        assert_eq!(by_range.len(), 2);

        let by_agent_status = EntryFilter::new()
            .agent("a")
            .status(Status::Failed)
            .apply(entries.clone());
        assert_eq!(by_agent_status.len(), 1);
        assert_eq!(by_agent_status[0].date(), Some("2025-01-05"));

        let open_end = EntryFilter::new()
            .dates(Some("2025-01-03".into()), None)
            .apply(entries.clone());
        assert_eq!(open_end.len(), 2);

        assert!(EntryFilter::new().is_empty());
        assert_eq!(EntryFilter::new().apply(entries).len(), 4);
    }
}
