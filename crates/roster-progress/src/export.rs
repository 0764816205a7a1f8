//! Flat (CSV) and full-fidelity (JSON) projections of progress entries.

use std::path::Path;
use tracing::info;

use roster_core::RosterError;

use crate::entry::ProgressEntry;

pub const CSV_COLUMNS: &[&str] = &[
    "timestamp",
    "agent",
    "task_id",
    "task_title",
    "status",
    "duration_minutes",
    "progress_percent",
    "num_deliverables",
];

/// One row per entry. Each metric key seen anywhere becomes a
/// `metric_<key>` column, in first-seen order; entries without that metric
/// leave the cell empty.
pub fn to_csv(entries: &[ProgressEntry]) -> String {
    let mut metric_keys: Vec<&str> = Vec::new();
    for entry in entries {
        for (key, _) in entry.metrics.iter() {
            if !metric_keys.contains(&key) {
                metric_keys.push(key);
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = CSV_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(metric_keys.iter().map(|k| format!("metric_{k}")))
        .collect();
    push_row(&mut out, header.iter().map(String::as_str));

    for entry in entries {
        let opt = |v: Option<&str>| v.unwrap_or_default().to_string();
        let mut row = vec![
            opt(entry.timestamp.as_deref()),
            opt(entry.agent.as_deref()),
            opt(entry.task_id.as_deref()),
            opt(entry.task_title.as_deref()),
            entry.status.to_string(),
            entry.duration_minutes.map(|d| d.to_string()).unwrap_or_default(),
            entry.progress_percent.map(|p| p.to_string()).unwrap_or_default(),
            entry.deliverables.len().to_string(),
        ];
        row.extend(
            metric_keys
                .iter()
                .map(|k| entry.metrics.get(k).map(|v| v.to_string()).unwrap_or_default()),
        );
        push_row(&mut out, row.iter().map(String::as_str));
    }

    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    let cells: Vec<String> = cells.map(escape).collect();
    out.push_str(&cells.join(","));
    out.push_str("\r\n");
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Every entry with nested fields intact, as pretty JSON.
pub fn to_json(entries: &[ProgressEntry]) -> roster_core::Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn write_csv(entries: &[ProgressEntry], path: &Path) -> roster_core::Result<()> {
    write(path, &to_csv(entries))?;
    info!(path = ?path, entries = entries.len(), "exported progress CSV");
    Ok(())
}

pub fn write_json(entries: &[ProgressEntry], path: &Path) -> roster_core::Result<()> {
    write(path, &to_json(entries)?)?;
    info!(path = ?path, entries = entries.len(), "exported progress JSON");
    Ok(())
}

fn write(path: &Path, contents: &str) -> roster_core::Result<()> {
    std::fs::write(path, contents)
        .map_err(|e| RosterError::Export(format!("cannot write {}: {}", path.display(), e)))
}
