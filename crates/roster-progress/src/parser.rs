use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, info};

use roster_core::frontmatter::{
    is_delimiter, parse_mapping, scalar_to_string, split_block,
};
use roster_core::{Diagnostics, RosterError};

use crate::entry::{Deliverable, EntryFormat, MetricValue, Metrics, ProgressEntry, Status};
use crate::narrative::{self, NarrativeFields};
use crate::segment::{self, is_date_heading};

/// Entries parsed from one log, plus what was dropped on the way.
#[derive(Debug, Default)]
pub struct ProgressLog {
    pub entries: Vec<ProgressEntry>,
    pub diagnostics: Diagnostics,
}

/// Read and parse a log file. Only an unreadable file is an error.
pub fn parse_file(path: &Path) -> roster_core::Result<ProgressLog> {
    let content = std::fs::read_to_string(path).map_err(|e| RosterError::Document {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let log = parse_str(&content, &path.display().to_string());
    info!(
        path = ?path,
        entries = log.entries.len(),
        skipped = log.diagnostics.skipped(),
        "parsed progress log"
    );
    Ok(log)
}

/// Parse every entry in `content`. `source` names the log in diagnostics.
pub fn parse_str(content: &str, source: &str) -> ProgressLog {
    let content = content.replace("\r\n", "\n");
    let mut log = ProgressLog::default();

    for seg in segment::segment(&content) {
        let origin = format!("{source}#{}", seg.line);
        let Some(format) = detect_format(&seg.text) else {
            log.diagnostics.skip(origin, "no entry header");
            continue;
        };
        match parse_entry(&seg.text, format) {
            Ok(entry) => {
                debug!(source = %origin, format = ?entry.format, agent = ?entry.agent, "parsed entry");
                log.entries.push(entry);
            }
            Err(reason) => log.diagnostics.skip(origin, reason),
        }
    }

    log
}

/// Decide the layout of a segment, or `None` when it has no entry header.
pub fn detect_format(text: &str) -> Option<EntryFormat> {
    let text = text.trim_start();
    let first = text.lines().next()?;

    if is_delimiter(first) {
        let after_block = split_block(text).map(|(_, rest)| rest).unwrap_or_default();
        if after_block.lines().any(is_date_heading) {
            Some(EntryFormat::Hybrid)
        } else {
            Some(EntryFormat::Structured)
        }
    } else if is_date_heading(first) {
        Some(EntryFormat::Narrative)
    } else {
        None
    }
}

/// Parse one segment whose format is already known.
pub fn parse_entry(text: &str, format: EntryFormat) -> Result<ProgressEntry, String> {
    match format {
        EntryFormat::Narrative => parse_narrative(text),
        EntryFormat::Structured | EntryFormat::Hybrid => {
            let (block, rest) = split_block(text).ok_or("unterminated structured block")?;
            match parse_mapping(&block) {
                Ok(map) => {
                    let mut entry = structured_entry(&map, format);
                    if format == EntryFormat::Hybrid {
                        backfill(&mut entry, narrative::extract(&rest));
                    }
                    Ok(entry)
                }
                Err(reason) => Err(reason.to_string()),
            }
        }
    }
}

fn parse_narrative(text: &str) -> Result<ProgressEntry, String> {
    let fields = narrative::extract(text);
    let header = fields
        .header
        .clone()
        .ok_or("date heading is not of the form `## DATE [TIME] - @agent: Title`")?;

    let mut entry = ProgressEntry::new(EntryFormat::Narrative);
    entry.timestamp = Some(header.timestamp);
    entry.agent = Some(header.agent);
    entry.task_title = Some(header.title);
    entry.status = fields.status.unwrap_or_default();
    entry.task_id = fields.task_id;
    entry.duration_minutes = fields.duration_minutes;
    entry.progress_percent = fields.progress_percent;
    entry.deliverables = fields.deliverables.unwrap_or_default();
    entry.metrics = fields.metrics.unwrap_or_default();
    entry.context = fields.context;
    Ok(entry)
}

/// Structured values stay; the narrative part only fills gaps.
fn backfill(entry: &mut ProgressEntry, fields: NarrativeFields) {
    if let Some(header) = fields.header {
        entry.task_title.get_or_insert(header.title);
        entry.timestamp.get_or_insert(header.timestamp);
        entry.agent.get_or_insert(header.agent);
    }
    if entry.context.is_none() {
        entry.context = fields.context;
    }
    if entry.deliverables.is_empty() {
        entry.deliverables = fields.deliverables.unwrap_or_default();
    }
}

fn structured_entry(map: &Mapping, format: EntryFormat) -> ProgressEntry {
    let mut entry = ProgressEntry::new(format);

    for (key, value) in map {
        let Some(key) = scalar_to_string(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "timestamp" => entry.timestamp = scalar_to_string(value),
            "agent" => {
                entry.agent = scalar_to_string(value).map(|a| a.trim_start_matches('@').to_string())
            }
            "task_id" => entry.task_id = scalar_to_string(value),
            "task_title" => entry.task_title = scalar_to_string(value),
            "context" => entry.context = scalar_to_string(value).map(|c| c.trim().to_string()),
            "status" => {
                entry.status = scalar_to_string(value)
                    .map(|s| s.parse::<Status>().unwrap_or_else(|_| narrative::classify_status(&s)))
                    .unwrap_or_default()
            }
            "duration_minutes" => entry.duration_minutes = duration_minutes(value),
            "progress_percent" => entry.progress_percent = progress_percent(value),
            "deliverables" => entry.deliverables = deliverables(value),
            "metrics" => entry.metrics = metrics(value),
            _ => {
                let json = serde_json::to_value(value)
                    .unwrap_or_else(|_| serde_json::Value::String(format!("{value:?}")));
                entry.extra.insert(key, json);
            }
        }
    }

    entry
}

fn duration_minutes(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok().or_else(|| {
            narrative::extract(&format!("**Duration**: {s}")).duration_minutes
        }),
        _ => None,
    }
}

fn progress_percent(value: &Value) -> Option<u8> {
    let raw = scalar_to_string(value)?;
    match MetricValue::coerce(&raw).as_f64() {
        Some(p) if p >= 0.0 => Some(p.min(100.0).round() as u8),
        _ => None,
    }
}

fn deliverables(value: &Value) -> Vec<Deliverable> {
    let Value::Sequence(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Mapping(m) => {
                let field = |k: &str| m.get(k).and_then(scalar_to_string);
                Some(Deliverable::new(
                    field("path")?,
                    field("type"),
                    field("description").unwrap_or_default(),
                ))
            }
            other => scalar_to_string(other).map(|path| Deliverable::new(path, None, "")),
        })
        .collect()
}

fn metrics(value: &Value) -> Metrics {
    let Value::Mapping(map) = value else {
        return Metrics::new();
    };
    map.iter()
        .filter_map(|(k, v)| {
            let key = scalar_to_string(k)?;
            let value = match v {
                Value::Number(n) => match n.as_i64() {
                    Some(i) => MetricValue::Integer(i),
                    None => MetricValue::Float(n.as_f64()?),
                },
                other => MetricValue::coerce(&scalar_to_string(other)?),
            };
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrative_example_entry() {
        let text = "## 2025-01-15 09:00 - @backend-architect: Fix login\n**Status**: ✅ Complete\n**Duration**: 2h 30m";
        let log = parse_str(text, "log");
        assert_eq!(log.entries.len(), 1);
        let e = &log.entries[0];
        assert_eq!(e.agent.as_deref(), Some("backend-architect"));
        assert_eq!(e.status, Status::Complete);
        assert_eq!(e.duration_minutes, Some(150));
        assert_eq!(e.timestamp.as_deref(), Some("2025-01-15 09:00"));
        assert_eq!(e.task_title.as_deref(), Some("Fix login"));
        assert_eq!(e.format, EntryFormat::Narrative);
    }

    #[test]
    fn structured_becomes_hybrid_with_heading() {
        let structured = "---\nagent: a\nstatus: complete\n---\n";
        assert_eq!(detect_format(structured), Some(EntryFormat::Structured));

        let hybrid = "---\nagent: a\nstatus: complete\n---\n\n## 2025-01-15 10:00 - @a: Title\n";
        assert_eq!(detect_format(hybrid), Some(EntryFormat::Hybrid));
    }

    #[test]
    fn detect_rejects_text_without_header() {
        assert_eq!(detect_format("# Progress log\nsome intro"), None);
        assert_eq!(detect_format(""), None);
    }

    #[test]
    fn structured_fields_and_extra() {
        let text = "---\ntimestamp: 2025-01-16 14:00\nagent: '@qa'\ntask_id: QA-1\nstatus: In Progress\nduration_minutes: 90\nprogress_percent: 55%\ndeliverables:\n  - path: tests/login.rs\n    type: test\n  - README.md\nmetrics:\n  test_coverage: 81.5\n  failing: 2\nreviewer: sam\n---\n";
        let e = parse_entry(text, EntryFormat::Structured).unwrap();
        assert_eq!(e.timestamp.as_deref(), Some("2025-01-16 14:00"));
        assert_eq!(e.agent.as_deref(), Some("qa"));
        assert_eq!(e.status, Status::InProgress);
        assert_eq!(e.duration_minutes, Some(90));
        assert_eq!(e.progress_percent, Some(55));
        assert_eq!(e.deliverables.len(), 2);
        assert_eq!(e.deliverables[0].kind, "test");
        assert_eq!(e.deliverables[1].kind, "unknown");
        assert_eq!(e.metrics.get("test_coverage"), Some(&MetricValue::Float(81.5)));
        assert_eq!(e.metrics.get("failing"), Some(&MetricValue::Integer(2)));
        assert_eq!(e.extra["reviewer"], serde_json::json!("sam"));
    }

    #[test]
    fn structured_duration_accepts_hours_text() {
        let e = parse_entry("---\nduration_minutes: 1h 15m\n---\n", EntryFormat::Structured).unwrap();
        assert_eq!(e.duration_minutes, Some(75));
    }

    #[test]
    fn hybrid_structured_values_win() {
        let text = "---\nagent: data-engineer\ntask_title: From the block\nstatus: blocked\n---\n\n## 2025-01-17 08:30 - @someone-else: From the heading\n**Status**: ✅ Complete\n**Deliverables**:\n- `etl/job.py` (type: code) - pipeline\n\n### Context\nWaiting on credentials.\n";
        let e = parse_entry(text, EntryFormat::Hybrid).unwrap();
        assert_eq!(e.format, EntryFormat::Hybrid);
        assert_eq!(e.agent.as_deref(), Some("data-engineer"));
        assert_eq!(e.task_title.as_deref(), Some("From the block"));
        assert_eq!(e.status, Status::Blocked);
        assert_eq!(e.timestamp.as_deref(), Some("2025-01-17 08:30"));
        assert_eq!(e.deliverables[0].path, "etl/job.py");
        assert_eq!(e.context.as_deref(), Some("Waiting on credentials."));
    }

    #[test]
    fn malformed_entries_are_skipped_with_diagnostics() {
        let log = "# Log\n\n## 2025-01-15 weekly sync\n\n## 2025-01-16 - @ok: Fine\n**Status**: ❌ Failed\n\n---\nagent: [broken\n---\n";
        let parsed = parse_str(log, "SHARED_PROGRESS.md");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].status, Status::Failed);
        assert_eq!(parsed.diagnostics.skipped(), 3);
        let sources: Vec<_> = parsed.diagnostics.iter().map(|d| d.source.as_str()).collect();
        assert_eq!(
            sources,
            vec!["SHARED_PROGRESS.md#1", "SHARED_PROGRESS.md#3", "SHARED_PROGRESS.md#8"]
        );
    }

    #[test]
    fn rule_separated_narrative_entries_survive() {
        let between = "## 2025-01-15 - @a: One\n**Status**: ✅ Complete\n\n---\n## 2025-01-16 - @b: Two\n**Status**: 🔄 In Progress\n---\n## 2025-01-17 - @c: Three\n";
        let parsed = parse_str(between, "log");
        let agents: Vec<_> = parsed.entries.iter().map(|e| e.agent_or_unknown()).collect();
        assert_eq!(agents, vec!["a", "b", "c"]);
        assert_eq!(parsed.entries[1].status, Status::InProgress);
        assert!(parsed.entries.iter().all(|e| e.format == EntryFormat::Narrative));
        assert!(parsed.diagnostics.is_empty());

        let after_each = "## 2025-01-15 - @a: One\n---\n## 2025-01-16 - @b: Two\n---\n## 2025-01-17 - @c: Three\n---\n## 2025-01-18 - @d: Four\n---\n";
        let parsed = parse_str(after_each, "log");
        let agents: Vec<_> = parsed.entries.iter().map(|e| e.agent_or_unknown()).collect();
        assert_eq!(agents, vec!["a", "b", "c", "d"]);
        assert!(parsed.diagnostics.is_empty());
    }

    #[test]
    fn rule_after_hybrid_starts_next_entry() {
        let log = "---\nagent: a\nstatus: blocked\n---\n## 2025-01-15 - @a: One\n---\n## 2025-01-16 - @b: Two\n";
        let parsed = parse_str(log, "log");
        let formats: Vec<_> = parsed.entries.iter().map(|e| e.format).collect();
        assert_eq!(formats, vec![EntryFormat::Hybrid, EntryFormat::Narrative]);
        assert_eq!(parsed.entries[1].agent.as_deref(), Some("b"));
    }

    #[test]
    fn crlf_logs_parse() {
        let log = "## 2025-01-15 09:00 - @a: One\r\n**Duration**: 1h\r\n";
        let parsed = parse_str(log, "log");
        assert_eq!(parsed.entries[0].duration_minutes, Some(60));
        assert_eq!(parsed.entries[0].task_title.as_deref(), Some("One"));
    }
}
