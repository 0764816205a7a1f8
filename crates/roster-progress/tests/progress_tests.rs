#[cfg(test)]
mod tests {
    use roster_progress::*;

    const LOG: &str = "# Shared Progress

## 2025-01-15 09:00 - @backend-architect: Fix login
**Status**: ✅ Complete
**Task ID**: AUTH-42
**Duration**: 2h 30m
**Deliverables**:
- `src/auth/login.rs` (type: code) - session fix
- `tests/login.rs` (type: test) - regression test
**Metrics**:
- test_coverage: 87%
- files_changed: 4

---
timestamp: 2025-01-16 14:00
agent: qa-lead
task_title: Nightly regression
status: failed
duration_minutes: 60
metrics:
  Test Coverage: 75
---

---
agent: data-engineer
status: blocked
---

## 2025-01-17 08:30 - @data-engineer: ETL backfill
**Deliverables**:
- `etl/backfill.py` (type: code) - backfill job

### Context
Waiting on warehouse credentials.

## 2025-01-18 - @qa-lead: Flaky test triage
**Status**: ❌ Failed
**Duration**: 0m
";

    fn parsed() -> ProgressLog {
        parse_str(LOG, "SHARED_PROGRESS.md")
    }

    // ── Parsing ───────────────────────────────────────────────

    #[test]
    fn test_mixed_log_formats() {
        let log = parsed();
        let formats: Vec<_> = log.entries.iter().map(|e| e.format).collect();
        assert_eq!(
            formats,
            vec![
                EntryFormat::Narrative,
                EntryFormat::Structured,
                EntryFormat::Hybrid,
                EntryFormat::Narrative,
            ]
        );
        // only the "# Shared Progress" preamble is dropped
        assert_eq!(log.diagnostics.skipped(), 1);
    }

    #[test]
    fn test_hybrid_entry_merges_prose() {
        let log = parsed();
        let hybrid = &log.entries[2];
        assert_eq!(hybrid.agent.as_deref(), Some("data-engineer"));
        assert_eq!(hybrid.status, Status::Blocked);
        assert_eq!(hybrid.task_title.as_deref(), Some("ETL backfill"));
        assert_eq!(hybrid.timestamp.as_deref(), Some("2025-01-17 08:30"));
        assert_eq!(hybrid.deliverables.len(), 1);
        assert_eq!(hybrid.context.as_deref(), Some("Waiting on warehouse credentials."));
    }

    #[test]
    fn test_parse_file_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SHARED_PROGRESS.md");
        std::fs::write(&path, LOG).unwrap();
        assert_eq!(parse_file(&path).unwrap().entries.len(), 4);
        assert!(parse_file(&dir.path().join("missing.md")).is_err());
    }

    // ── Analytics ─────────────────────────────────────────────

    #[test]
    fn test_summary_over_log() {
        let log = parsed();
        let summary = ProgressSummary::from_entries(&log.entries);
        assert_eq!(summary.total_entries, 4);
        assert_eq!(summary.total_duration_minutes, 150 + 60);
        assert_eq!(summary.by_status[&Status::Failed], 2);
        assert_eq!(summary.by_agent["qa-lead"], 2);
        assert_eq!(summary.total_deliverables, 3);
        assert_eq!(summary.avg_test_coverage, Some(81.0));
    }

    #[test]
    fn test_filters_over_log() {
        let log = parsed();
        let qa = EntryFilter::new().agent("qa-lead").apply(log.entries.clone());
        assert_eq!(qa.len(), 2);

        let mid_january = EntryFilter::new()
            .dates(Some("2025-01-16".into()), Some("2025-01-17".into()))
            .apply(log.entries);
        let agents: Vec<_> = mid_january.iter().map(|e| e.agent_or_unknown()).collect();
        assert_eq!(agents, vec!["qa-lead", "data-engineer"]);
    }

    // ── Export ────────────────────────────────────────────────

    #[test]
    fn test_exports_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let log = parsed();
        let csv_path = dir.path().join("progress.csv");
        let json_path = dir.path().join("progress.json");

        export::write_csv(&log.entries, &csv_path).unwrap();
        export::write_json(&log.entries, &json_path).unwrap();

        let csv = std::fs::read_to_string(&csv_path).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.ends_with("metric_test_coverage,metric_files_changed,metric_Test Coverage"));
        assert_eq!(csv.lines().count(), 5);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[0]["deliverables"][1]["type"], "test");
        assert_eq!(json[1]["format"], "structured");

        let back: Vec<ProgressEntry> = serde_json::from_value(json).unwrap();
        assert_eq!(back[2].context, log.entries[2].context);
    }

    #[test]
    fn test_report_over_log() {
        let report = report::render(&parsed().entries);
        assert!(report.contains("📊 Total Entries: 4"));
        assert!(report.contains("✅ Average Test Coverage: 81%"));
        assert!(report.contains("  ❌ Failed: 2"));
    }
}
