//! Field extraction from narrative (Markdown) entries.
//!
//! Every field is found by its own search over the whole entry, so field
//! order does not matter and a missing field leaves the others intact:
//!
//! ```text
//! ## 2025-01-15 09:00 - @backend-architect: Fix login
//! **Status**: ✅ Complete
//! **Task ID**: AUTH-42
//! **Duration**: 2h 30m
//! **Progress**: 100%
//! **Deliverables**:
//! - `src/auth/login.rs` (type: code) - session fix
//! **Metrics**:
//! - test_coverage: 87%
//!
//! ### Context
//! Users were logged out after refresh.
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::entry::{Deliverable, MetricValue, Metrics, Status};

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^## (\d{4}-\d{2}-\d{2})(?: (\d{2}:\d{2}))? - @([\w-]+): (.+)$").expect("static regex")
});
static STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Status\*\*:[ \t]*([^\n|]+)").expect("static regex"));
static TASK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Task ID\*\*:[ \t]*(\S+)").expect("static regex"));
static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Duration\*\*:[ \t]*(?:(\d+)h[ \t]*)?(?:(\d+)m)?").expect("static regex")
});
static PROGRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Progress\*\*:[ \t]*(\d+)%").expect("static regex"));
static DELIVERABLES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\*\*Deliverables\*\*:\n((?:^[ \t]*-.*\n?)+)").expect("static regex")
});
static DELIVERABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`([^`]+)`(?:\s*\(type:\s*(\w+)\))?\s*-?\s*(.*)").expect("static regex")
});
static METRICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\*\*Metrics\*\*[^:\n]*:\n((?:^[ \t]*-.*\n?)+)").expect("static regex")
});

/// Status markers, checked in order. Matching is case-sensitive.
const STATUS_MARKERS: &[(&[&str], Status)] = &[
    (&["✅", "Complete"], Status::Complete),
    (&["🔄", "Progress"], Status::InProgress),
    (&["⚠", "Blocked"], Status::Blocked),
    (&["❌", "Failed"], Status::Failed),
    (&["🚧", "Paused"], Status::Paused),
    (&["📋", "Planned"], Status::Planned),
];

/// The `## DATE [TIME] - @agent: Title` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// `YYYY-MM-DD HH:MM`, time defaulting to `00:00`.
    pub timestamp: String,
    pub agent: String,
    pub title: String,
}

/// Everything a narrative entry can contribute. `None` means "not written".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeFields {
    pub header: Option<Header>,
    pub status: Option<Status>,
    pub task_id: Option<String>,
    pub duration_minutes: Option<u64>,
    pub progress_percent: Option<u8>,
    pub deliverables: Option<Vec<Deliverable>>,
    pub metrics: Option<Metrics>,
    pub context: Option<String>,
}

/// Parse a header line.
pub fn parse_header(line: &str) -> Option<Header> {
    let caps = HEADER.captures(line.trim_end())?;
    let date = &caps[1];
    let time = caps.get(2).map_or("00:00", |m| m.as_str());
    Some(Header {
        timestamp: format!("{date} {time}"),
        agent: caps[3].to_string(),
        title: caps[4].trim().to_string(),
    })
}

/// Extract every narrative field from `text`. The header is taken from the
/// first date heading in the text.
pub fn extract(text: &str) -> NarrativeFields {
    NarrativeFields {
        header: text
            .lines()
            .find(|l| crate::segment::is_date_heading(l))
            .and_then(parse_header),
        status: STATUS.captures(text).map(|c| classify_status(c[1].trim())),
        task_id: TASK_ID.captures(text).map(|c| c[1].to_string()),
        duration_minutes: DURATION.captures(text).map(|c| {
            let part = |i: usize| c.get(i).and_then(|m| m.as_str().parse::<u64>().ok()).unwrap_or(0);
            part(1).saturating_mul(60).saturating_add(part(2))
        }),
        progress_percent: PROGRESS
            .captures(text)
            .and_then(|c| c[1].parse::<u64>().ok())
            .map(|p| p.min(100) as u8),
        deliverables: DELIVERABLES
            .captures(text)
            .map(|c| parse_deliverables(&c[1]))
            .filter(|d| !d.is_empty()),
        metrics: METRICS
            .captures(text)
            .map(|c| parse_metrics(&c[1]))
            .filter(|m| !m.is_empty()),
        context: context_section(text),
    }
}

/// Map a status text onto the fixed marker vocabulary.
pub fn classify_status(text: &str) -> Status {
    STATUS_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| text.contains(m)))
        .map_or(Status::Unknown, |(_, status)| *status)
}

fn parse_deliverables(block: &str) -> Vec<Deliverable> {
    block
        .lines()
        .filter(|l| l.trim_start().starts_with('-'))
        .filter_map(|l| DELIVERABLE.captures(l))
        .map(|c| {
            Deliverable::new(
                &c[1],
                c.get(2).map(|m| m.as_str().to_string()),
                c[3].trim(),
            )
        })
        .collect()
}

fn parse_metrics(block: &str) -> Metrics {
    block
        .lines()
        .filter_map(|l| l.split_once(':'))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches('-').trim();
            (key.to_string(), MetricValue::coerce(value))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Lines after a `### Context` heading, up to the next `###` heading.
fn context_section(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|l| l.trim_end() != "### Context");
    lines.next()?;
    let body: Vec<&str> = lines.take_while(|l| !l.starts_with("###")).collect();
    let body = body.join("\n");
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_with_and_without_time() {
        let h = parse_header("## 2025-01-15 09:00 - @backend-architect: Fix login").unwrap();
        assert_eq!(h.timestamp, "2025-01-15 09:00");
        assert_eq!(h.agent, "backend-architect");
        assert_eq!(h.title, "Fix login");

        let h = parse_header("## 2025-01-15 - @qa_lead: Regression pass").unwrap();
        assert_eq!(h.timestamp, "2025-01-15 00:00");
        assert_eq!(h.agent, "qa_lead");

        assert!(parse_header("## 2025-01-15 weekly notes").is_none());
    }

    #[test]
    fn status_vocabulary_is_case_sensitive() {
        assert_eq!(classify_status("✅ Complete"), Status::Complete);
        assert_eq!(classify_status("🔄 In Progress"), Status::InProgress);
        assert_eq!(classify_status("⚠️ Blocked on review"), Status::Blocked);
        assert_eq!(classify_status("Failed"), Status::Failed);
        assert_eq!(classify_status("complete"), Status::Unknown);
        assert_eq!(classify_status("done"), Status::Unknown);
    }

    #[test]
    fn fields_are_order_insensitive() {
        let text = "## 2025-02-01 - @a: T\n**Duration**: 45m\n**Task ID**: T-9\n**Status**: 📋 Planned\n**Progress**: 140%";
        let f = extract(text);
        assert_eq!(f.status, Some(Status::Planned));
        assert_eq!(f.task_id.as_deref(), Some("T-9"));
        assert_eq!(f.duration_minutes, Some(45));
        assert_eq!(f.progress_percent, Some(100));
    }

    #[test]
    fn duration_parts_default_to_zero() {
        assert_eq!(extract("**Duration**: 3h").duration_minutes, Some(180));
        assert_eq!(extract("**Duration**: 2h 30m").duration_minutes, Some(150));
        assert_eq!(extract("**Duration**: soon").duration_minutes, Some(0));
        assert_eq!(extract("no duration here").duration_minutes, None);
    }

    #[test]
    fn deliverables_block() {
        let text = "**Deliverables**:\n- `src/a.rs` (type: code) - the fix\n- `docs/b.md` - notes\n  - `c.txt`\n\nAfter.";
        let d = extract(text).deliverables.unwrap();
        assert_eq!(d.len(), 3);
        assert_eq!(d[0], Deliverable::new("src/a.rs", Some("code".into()), "the fix"));
        assert_eq!(d[1].kind, "unknown");
        assert_eq!(d[1].description, "notes");
        assert_eq!(d[2].path, "c.txt");
    }

    #[test]
    fn metrics_block_coerces_values() {
        let text = "**Metrics** (end of day):\n- test_coverage: 87%\n- latency_ms: 12.5\n- note: flaky CI\n- no colon line\n";
        let m = extract(text).metrics.unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get("test_coverage"), Some(&MetricValue::Integer(87)));
        assert_eq!(m.get("latency_ms"), Some(&MetricValue::Float(12.5)));
        assert_eq!(m.get("note"), Some(&MetricValue::Text("flaky CI".into())));
    }

    #[test]
    fn context_runs_to_next_subheading() {
        let text = "### Context\nFirst line.\nSecond line.\n### Notes\nignored";
        assert_eq!(extract(text).context.as_deref(), Some("First line.\nSecond line."));
        assert_eq!(extract("### Context\n\n").context, None);
    }
}
