//! Lightweight `<name>.summary.yaml` files generated from full descriptors.
//!
//! A summary carries only what is needed to pick an agent: the top few
//! specializations and technologies, its relationships, and short "use when"
//! phrases. The full descriptor is referenced by path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use roster_core::{Diagnostics, DocumentStore, RosterError};

use crate::extractor;
use crate::record::{
    CapabilityRecord, default_avg_task_duration_hours, default_version,
};

pub const SUMMARY_SUFFIX: &str = "summary.yaml";

const MAX_SPECIALIZATIONS: usize = 5;
const MAX_TECHNOLOGIES: usize = 8;
const MAX_PARTNERS: usize = 3;
const MAX_USE_WHEN: usize = 5;
const SPECIALIZATION_CUES: usize = 3;

/// Description cue → phrase. A cue matches as a lower-case substring.
const DESCRIPTION_CUES: &[(&[&str], &str)] = &[
    (&["api"], "building APIs"),
    (&["database", "data"], "working with data"),
    (&["frontend", "ui"], "building user interfaces"),
    (&["security"], "security concerns"),
    (&["performance", "optimization"], "optimization needed"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub consultation_available: bool,
    #[serde(default = "default_avg_task_duration_hours")]
    pub avg_task_duration_hours: f64,
    /// Path of the descriptor this summary was generated from.
    #[serde(default)]
    pub full_definition: PathBuf,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires_agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub works_well_with: Vec<String>,
    #[serde(default)]
    pub use_when: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl AgentSummary {
    pub fn from_record(record: &CapabilityRecord) -> Self {
        let specializations = head(&record.specializations, MAX_SPECIALIZATIONS);
        let use_when = use_when(&specializations, &record.description);
        Self {
            name: record.name.clone(),
            version: record.version.clone(),
            category: record.category.clone(),
            description: record.description.clone(),
            consultation_available: record.consultation_available,
            avg_task_duration_hours: record.avg_task_duration_hours,
            full_definition: record.file_path.clone(),
            technologies: head(&record.technologies, MAX_TECHNOLOGIES),
            requires_agents: record.requires_agents.clone(),
            works_well_with: head(&record.works_well_with, MAX_PARTNERS),
            specializations,
            use_when,
        }
    }

    /// File name this summary is written under.
    pub fn file_name(&self) -> String {
        format!("{}.{SUMMARY_SUFFIX}", self.name)
    }

    pub fn from_file(path: &Path) -> roster_core::Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RosterError::Document {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn to_yaml(&self) -> roster_core::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn head(items: &[String], n: usize) -> Vec<String> {
    items.iter().take(n).cloned().collect()
}

fn use_when(specializations: &[String], description: &str) -> Vec<String> {
    let mut phrases: Vec<String> = specializations
        .iter()
        .take(SPECIALIZATION_CUES)
        .map(|s| format!("need {}", s.replace('_', " ")))
        .collect();

    let description = description.to_lowercase();
    for (cues, phrase) in DESCRIPTION_CUES {
        if cues.iter().any(|c| description.contains(c)) {
            phrases.push(phrase.to_string());
        }
    }

    phrases.truncate(MAX_USE_WHEN);
    phrases
}

/// Counts from [`generate_all`].
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub generated: usize,
    /// Summaries left alone because the file already existed.
    pub existing: usize,
    /// Descriptors that produced no summary, or whose summary could not be written.
    pub failed: usize,
    pub diagnostics: Diagnostics,
}

/// Write a summary for every descriptor in `store` into `output_dir`.
///
/// Existing summary files are kept unless `overwrite` is set.
pub fn generate_all(
    store: &DocumentStore,
    output_dir: &Path,
    overwrite: bool,
) -> roster_core::Result<GenerateReport> {
    let (documents, diagnostics) = store.load()?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = GenerateReport {
        failed: diagnostics.skipped(),
        diagnostics,
        ..Default::default()
    };

    for doc in &documents {
        let Some(record) = extractor::extract(doc, &mut report.diagnostics) else {
            report.failed += 1;
            continue;
        };

        let summary = AgentSummary::from_record(&record);
        let target = output_dir.join(summary.file_name());
        if target.exists() && !overwrite {
            report
                .diagnostics
                .info(target.display().to_string(), "summary exists, kept (overwrite to replace)");
            report.existing += 1;
            continue;
        }

        let written = summary
            .to_yaml()
            .and_then(|yaml| std::fs::write(&target, yaml).map_err(RosterError::from));
        match written {
            Ok(()) => {
                debug!(agent = %summary.name, path = ?target, "wrote summary");
                report.generated += 1;
            }
            Err(e) => {
                report
                    .diagnostics
                    .skip(target.display().to_string(), format!("cannot write summary: {e}"));
                report.failed += 1;
            }
        }
    }

    info!(
        generated = report.generated,
        existing = report.existing,
        failed = report.failed,
        output = ?output_dir,
        "generated summaries"
    );
    Ok(report)
}
