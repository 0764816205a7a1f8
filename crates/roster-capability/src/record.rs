use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::inference::word_tokens;

/// Weight of a specialization hit in [`CapabilityRecord::matches_requirement`].
const SPECIALIZATION_WEIGHT: f64 = 3.0;
const TECHNOLOGY_WEIGHT: f64 = 2.0;
/// Keyword hits contribute this much each, up to [`KEYWORD_WEIGHT`].
const KEYWORD_HIT_WEIGHT: f64 = 0.5;
const KEYWORD_WEIGHT: f64 = 2.0;
const DESCRIPTION_WEIGHT: f64 = 1.0;
const MAX_SCORE: f64 = SPECIALIZATION_WEIGHT + TECHNOLOGY_WEIGHT + KEYWORD_WEIGHT + DESCRIPTION_WEIGHT;

/// Normalized capabilities of one agent, built from one descriptor document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityRecord {
    /// Unique agent name (from the `name` header key).
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    /// Directory the descriptor lives in.
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub file_operations: Vec<String>,
    #[serde(default)]
    pub command_execution: Vec<String>,
    #[serde(default)]
    pub external_access: Vec<String>,

    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub methodologies: Vec<String>,

    #[serde(default = "default_true")]
    pub consultation_available: bool,
    #[serde(default)]
    pub always_apply: bool,
    #[serde(default = "default_max_parallel_tasks")]
    pub max_parallel_tasks: u32,
    #[serde(default = "default_avg_task_duration_hours")]
    pub avg_task_duration_hours: f64,

    /// Agents this one cannot work without.
    #[serde(default)]
    pub requires_agents: Vec<String>,
    #[serde(default)]
    pub works_well_with: Vec<String>,
    #[serde(default)]
    pub provides_for: Vec<String>,

    /// Tokens from the description, used only for fuzzy matching.
    #[serde(default)]
    pub keywords: BTreeSet<String>,
    #[serde(default)]
    pub file_path: PathBuf,
}

pub(crate) fn default_version() -> String {
    "1.0.0".into()
}

fn default_true() -> bool {
    true
}

pub(crate) fn default_max_parallel_tasks() -> u32 {
    3
}

pub(crate) fn default_avg_task_duration_hours() -> f64 {
    2.0
}

impl CapabilityRecord {
    /// A record with every facet empty and every parameter at its default.
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: default_version(),
            description: String::new(),
            category: category.into(),
            file_operations: Vec::new(),
            command_execution: Vec::new(),
            external_access: Vec::new(),
            specializations: Vec::new(),
            technologies: Vec::new(),
            methodologies: Vec::new(),
            consultation_available: true,
            always_apply: false,
            max_parallel_tasks: default_max_parallel_tasks(),
            avg_task_duration_hours: default_avg_task_duration_hours(),
            requires_agents: Vec::new(),
            works_well_with: Vec::new(),
            provides_for: Vec::new(),
            keywords: BTreeSet::new(),
            file_path: PathBuf::new(),
        }
    }

    /// Score how well this agent fits a free-text requirement, in `[0, 1]`.
    ///
    /// | signal                                   | weight            |
    /// |------------------------------------------|-------------------|
    /// | any specialization inside the requirement | 3                |
    /// | any technology inside the requirement     | 2                |
    /// | distinct keyword hits                     | 0.5 each, max 2  |
    /// | any word shared with the description      | 1                |
    ///
    /// The achieved weight is divided by the maximum of 8.
    pub fn matches_requirement(&self, requirement: &str) -> f64 {
        let requirement = requirement.to_lowercase();
        let mut score = 0.0;

        if contains_any(&requirement, &self.specializations) {
            score += SPECIALIZATION_WEIGHT;
        }
        if contains_any(&requirement, &self.technologies) {
            score += TECHNOLOGY_WEIGHT;
        }

        let keyword_hits = self
            .keywords
            .iter()
            .filter(|kw| requirement.contains(kw.to_lowercase().as_str()))
            .count();
        score += (keyword_hits as f64 * KEYWORD_HIT_WEIGHT).min(KEYWORD_WEIGHT);

        let description_words: BTreeSet<String> = word_tokens(&self.description).collect();
        if word_tokens(&requirement).any(|w| description_words.contains(&w)) {
            score += DESCRIPTION_WEIGHT;
        }

        score / MAX_SCORE
    }

    /// Specializations followed by technologies, the tags a team member covers.
    pub fn coverage_tags(&self) -> impl Iterator<Item = &String> {
        self.specializations.iter().chain(self.technologies.iter())
    }
}

fn contains_any(haystack: &str, tags: &[String]) -> bool {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .any(|t| !t.is_empty() && haystack.contains(t.as_str()))
}
