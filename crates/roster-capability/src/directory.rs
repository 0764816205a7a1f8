//! Directory of generated summaries, loaded in tiers.
//!
//! Loading reads every `*.summary.yaml` once and keeps only a short listing
//! per agent. Full summaries and descriptors are read on request and cached;
//! loading an agent's descriptor also marks it active until it is
//! deactivated.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use roster_core::{Diagnostics, DocumentStore, RosterError};

use crate::summary::{AgentSummary, SUMMARY_SUFFIX};

const DESCRIPTION_PREVIEW: usize = 100;
const STATUS_PREVIEW: usize = 60;

/// Rough characters per token.
const CHARS_PER_TOKEN: usize = 4;

const DESCRIPTION_SCORE: f64 = 2.0;
const SPECIALIZATION_SCORE: f64 = 3.0;
const TECHNOLOGY_SCORE: f64 = 2.0;
const USE_WHEN_SCORE: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub category: String,
    /// First 100 characters of the description.
    pub description: String,
    pub summary_file: PathBuf,
}

#[derive(Debug, Default)]
struct AgentCache {
    summaries: BTreeMap<String, AgentSummary>,
    definitions: BTreeMap<String, String>,
    active: BTreeSet<String>,
}

/// Approximate context cost of what is currently loaded, per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenEstimate {
    pub directory_tokens: usize,
    pub summaries_tokens: usize,
    pub definitions_tokens: usize,
    pub total_tokens: usize,
    pub active_agents: usize,
    pub cached_summaries: usize,
    pub cached_definitions: usize,
}

#[derive(Debug, Default)]
pub struct SummaryDirectory {
    entries: BTreeMap<String, DirectoryEntry>,
    cache: AgentCache,
}

impl SummaryDirectory {
    /// Load the listing from `dir`. A missing directory yields an empty
    /// listing and a warning; unreadable summaries are skipped.
    pub fn load(dir: &Path) -> (Self, Diagnostics) {
        let mut directory = Self::default();
        let mut diagnostics = Diagnostics::new();

        let store = DocumentStore::new(dir, &[SUMMARY_SUFFIX]).shallow();
        let paths = match store.enumerate() {
            Ok(paths) => paths,
            Err(e) => {
                diagnostics.warn(dir.display().to_string(), format!("{e}; generate summaries first"));
                return (directory, diagnostics);
            }
        };

        for path in paths {
            let source = path.display().to_string();
            match AgentSummary::from_file(&path) {
                Ok(summary) if !summary.name.trim().is_empty() => {
                    debug!(agent = %summary.name, path = %source, "listed summary");
                    directory.entries.insert(
                        summary.name,
                        DirectoryEntry {
                            category: if summary.category.is_empty() {
                                "unknown".into()
                            } else {
                                summary.category
                            },
                            description: summary.description.chars().take(DESCRIPTION_PREVIEW).collect(),
                            summary_file: path,
                        },
                    );
                }
                Ok(_) => diagnostics.skip(source, "summary has no name"),
                Err(e) => diagnostics.skip(source, e.to_string()),
            }
        }

        if directory.is_empty() {
            warn!(dir = ?dir, "no summaries found");
        } else {
            info!(agents = directory.len(), "loaded agent directory");
        }
        (directory, diagnostics)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &DirectoryEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Agent names, optionally restricted to one category.
    pub fn list_agents(&self, category: Option<&str>) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| category.is_none_or(|c| e.category == c))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn list_categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.entries.values().map(|e| e.category.as_str()).collect();
        set.into_iter().collect()
    }

    /// The summary for `name`, read from disk on first use.
    pub fn summary(&mut self, name: &str) -> roster_core::Result<&AgentSummary> {
        if !self.cache.summaries.contains_key(name) {
            let entry = self.entries.get(name).ok_or_else(|| RosterError::NotFound {
                kind: "agent",
                name: name.to_string(),
            })?;
            let summary = AgentSummary::from_file(&entry.summary_file)?;
            debug!(agent = %name, "cached summary");
            self.cache.summaries.insert(name.to_string(), summary);
        }
        Ok(&self.cache.summaries[name])
    }

    /// The descriptor the summary for `name` points at. Loading it marks the
    /// agent active.
    pub fn load_full_definition(&mut self, name: &str) -> roster_core::Result<&str> {
        if !self.cache.definitions.contains_key(name) {
            let path = self.summary(name)?.full_definition.clone();
            let text = std::fs::read_to_string(&path).map_err(|e| RosterError::Document {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            debug!(agent = %name, path = ?path, "cached full definition");
            self.cache.definitions.insert(name.to_string(), text);
        }
        self.cache.active.insert(name.to_string());
        Ok(&self.cache.definitions[name])
    }

    /// Load the full definition of `name` and mark it active.
    pub fn activate(&mut self, name: &str) -> roster_core::Result<()> {
        self.load_full_definition(name)?;
        info!(agent = %name, "activated agent");
        Ok(())
    }

    /// Drop `name` from the active set, keeping its cached text. Returns
    /// whether it was active.
    pub fn deactivate(&mut self, name: &str) -> bool {
        let was_active = self.cache.active.remove(name);
        if was_active {
            info!(agent = %name, "deactivated agent");
        } else {
            warn!(agent = %name, "agent not active");
        }
        was_active
    }

    /// Active agents, sorted by name.
    pub fn active_agents(&self) -> impl Iterator<Item = &str> {
        self.cache.active.iter().map(String::as_str)
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.cache.active.contains(name)
    }

    /// Forget every cached summary and definition, and the active set.
    pub fn clear_cache(&mut self) {
        self.cache = AgentCache::default();
        debug!("summary cache cleared");
    }

    pub fn token_estimate(&self) -> TokenEstimate {
        let directory_chars: usize = self
            .entries
            .iter()
            .map(|(name, e)| {
                name.chars().count()
                    + e.category.chars().count()
                    + e.description.chars().count()
                    + e.summary_file.to_string_lossy().chars().count()
            })
            .sum();
        let summaries_tokens = self
            .cache
            .summaries
            .values()
            .map(|s| s.to_yaml().map_or(0, |y| y.chars().count()) / CHARS_PER_TOKEN)
            .sum();
        let definitions_tokens = self
            .cache
            .definitions
            .values()
            .map(|d| d.chars().count() / CHARS_PER_TOKEN)
            .sum();
        let directory_tokens = directory_chars / CHARS_PER_TOKEN;

        TokenEstimate {
            directory_tokens,
            summaries_tokens,
            definitions_tokens,
            total_tokens: directory_tokens + summaries_tokens + definitions_tokens,
            active_agents: self.cache.active.len(),
            cached_summaries: self.cache.summaries.len(),
            cached_definitions: self.cache.definitions.len(),
        }
    }

    /// Loader status: tier sizes, token estimate and active agents.
    pub fn status(&self) -> String {
        let est = self.token_estimate();
        let rule = "=".repeat(60);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "AGENT LOADER STATUS");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "📂 Directory: {} agents ({} tokens)", self.len(), est.directory_tokens);
        let _ = writeln!(
            out,
            "📄 Cached Summaries: {} ({} tokens)",
            est.cached_summaries, est.summaries_tokens
        );
        let _ = writeln!(
            out,
            "📚 Cached Definitions: {} ({} tokens)",
            est.cached_definitions, est.definitions_tokens
        );
        let _ = writeln!(out, "▶️  Active Agents: {}", est.active_agents);
        let _ = writeln!(out, "💾 Total Token Usage: ~{} tokens", est.total_tokens);
        out.push_str(&rule);

        if !self.cache.active.is_empty() {
            out.push_str("\n\n▶️  Active Agents:");
            for name in &self.cache.active {
                let description = self
                    .cache
                    .summaries
                    .get(name)
                    .map(|s| s.description.chars().take(STATUS_PREVIEW).collect::<String>())
                    .unwrap_or_else(|| "No description".into());
                let _ = write!(out, "\n  • {name}: {description}");
            }
        }
        out
    }

    /// Rank agents by how well their summaries mention `query`.
    ///
    /// Summaries are cached as they are read. Agents scoring zero, or whose
    /// summary cannot be read, are left out.
    pub fn find(&mut self, query: &str, limit: usize) -> Vec<(String, f64)> {
        let query = query.to_lowercase();
        let names: Vec<String> = self.entries.keys().cloned().collect();
        let mut results: Vec<(String, f64)> = names
            .into_iter()
            .filter_map(|name| {
                let score = relevance(self.summary(&name).ok()?, &query);
                (score > 0.0).then_some((name, score))
            })
            .collect();
        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        results.truncate(limit);
        results
    }
}

/// `query` is already lower-cased.
fn relevance(summary: &AgentSummary, query: &str) -> f64 {
    let mut score = 0.0;
    if summary.description.to_lowercase().contains(query) {
        score += DESCRIPTION_SCORE;
    }
    for spec in &summary.specializations {
        if spec.to_lowercase().replace('_', " ").contains(query) {
            score += SPECIALIZATION_SCORE;
        }
    }
    for tech in &summary.technologies {
        if tech.to_lowercase().contains(query) {
            score += TECHNOLOGY_SCORE;
        }
    }
    for phrase in &summary.use_when {
        if phrase.to_lowercase().contains(query) {
            score += USE_WHEN_SCORE;
        }
    }
    score
}
