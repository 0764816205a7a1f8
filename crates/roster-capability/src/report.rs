use std::collections::BTreeMap;
use std::fmt::Write;

use crate::index::CapabilityIndex;

const RULE_WIDTH: usize = 60;
const CATEGORY_PREVIEW: usize = 3;
const TOP_TAGS: usize = 10;

impl CapabilityIndex {
    /// Human-readable overview of the index.
    pub fn report(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let stats = self.snapshot().stats;
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "AGENT CAPABILITY DISCOVERY REPORT");
        let _ = writeln!(out, "{rule}\n");

        let _ = writeln!(out, "📊 SUMMARY");
        let _ = writeln!(out, "  Total Agents: {}", stats.total_agents);
        let _ = writeln!(out, "  Categories: {}", stats.total_categories);
        let _ = writeln!(out, "  Specializations: {}", stats.total_specializations);
        let _ = writeln!(out, "  Technologies: {}\n", stats.total_technologies);

        let _ = writeln!(out, "📁 BY CATEGORY");
        for (category, agents) in self.categories() {
            let _ = writeln!(out, "  {category}: {} agents", agents.len());
            let mut preview: Vec<&String> = agents.iter().collect();
            preview.sort();
            for agent in preview.into_iter().take(CATEGORY_PREVIEW) {
                let _ = writeln!(out, "    - {agent}");
            }
            if agents.len() > CATEGORY_PREVIEW {
                let _ = writeln!(out, "    ... and {} more", agents.len() - CATEGORY_PREVIEW);
            }
        }
        out.push('\n');

        let _ = writeln!(out, "🎯 TOP SPECIALIZATIONS");
        for (tag, count) in top_by_count(self.specialization_index(), TOP_TAGS) {
            let _ = writeln!(out, "  {tag}: {count} agents");
        }
        out.push('\n');

        let _ = writeln!(out, "💻 TOP TECHNOLOGIES");
        for (tag, count) in top_by_count(self.technology_index(), TOP_TAGS) {
            let _ = writeln!(out, "  {tag}: {count} agents");
        }
        out.push('\n');

        let always: Vec<&str> = self
            .records()
            .iter()
            .filter(|r| r.always_apply)
            .map(|r| r.name.as_str())
            .collect();
        if !always.is_empty() {
            let _ = writeln!(out, "⭐ ALWAYS-APPLY AGENTS");
            for agent in always {
                let _ = writeln!(out, "  - {agent}");
            }
            out.push('\n');
        }

        out.push_str(&rule);
        out
    }
}

/// Tags ordered by agent count, most first; alphabetical among equals.
fn top_by_count(map: &BTreeMap<String, Vec<String>>, n: usize) -> Vec<(&str, usize)> {
    let mut counts: Vec<(&str, usize)> = map.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}
