use std::fmt::Write;

use crate::analytics::ProgressSummary;
use crate::entry::{ProgressEntry, Status};

const TOP_AGENTS: usize = 10;
const RECENT: usize = 5;

/// Human-readable summary of `entries`.
pub fn render(entries: &[ProgressEntry]) -> String {
    if entries.is_empty() {
        return "No entries found.".to_string();
    }

    let summary = ProgressSummary::from_entries(entries);
    let rule = "=".repeat(60);
    let mut out = String::new();

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "AGENT PROGRESS SUMMARY REPORT");
    let _ = writeln!(out, "{rule}\n");

    let _ = writeln!(out, "📊 Total Entries: {}", summary.total_entries);
    let _ = writeln!(
        out,
        "⏱️  Total Duration: {} minutes ({:.1} hours)",
        summary.total_duration_minutes,
        summary.total_hours()
    );
    let _ = writeln!(out, "📦 Total Deliverables: {}", summary.total_deliverables);
    if let Some(coverage) = summary.avg_test_coverage {
        let _ = writeln!(out, "✅ Average Test Coverage: {coverage}%");
    }
    out.push('\n');

    let _ = writeln!(out, "📈 By Status:");
    let mut statuses: Vec<(&Status, &usize)> = summary.by_status.iter().collect();
    statuses.sort_by_key(|(s, _)| s.as_str());
    for (status, count) in statuses {
        let _ = writeln!(out, "  {} {}: {count}", status.emoji(), status.label());
    }
    out.push('\n');

    let _ = writeln!(out, "🤖 By Agent (Top {TOP_AGENTS}):");
    for (agent, count) in summary.top_agents(TOP_AGENTS) {
        let _ = writeln!(out, "  {agent}: {count} tasks");
    }
    out.push('\n');

    let _ = writeln!(out, "🕐 Recent Activity (Last {RECENT} entries):");
    let mut recent: Vec<&ProgressEntry> = entries.iter().collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    for entry in recent.into_iter().take(RECENT) {
        let _ = writeln!(
            out,
            "  {} {} - @{}: {}",
            entry.status.emoji(),
            entry.timestamp.as_deref().unwrap_or("N/A"),
            entry.agent_or_unknown(),
            entry.task_title.as_deref().unwrap_or("Untitled"),
        );
    }
    out.push('\n');
    out.push_str(&rule);
    out
}
