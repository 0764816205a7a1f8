use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info};

use roster_core::{Diagnostics, Document, DocumentStore};

use crate::extractor;
use crate::record::CapabilityRecord;

/// Outcome of a [`CapabilityIndex::scan`].
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Records added to the index.
    pub indexed: usize,
    /// Documents dropped (no header, no name, duplicate name, unreadable).
    pub skipped: usize,
    pub diagnostics: Diagnostics,
}

/// The capability index: records plus category, specialization and
/// technology lookup tables.
///
/// Records keep document order; that order breaks ties when ranking.
/// The index is rebuilt wholesale by every scan.
#[derive(Debug, Default)]
pub struct CapabilityIndex {
    records: Vec<CapabilityRecord>,
    positions: HashMap<String, usize>,
    categories: BTreeMap<String, Vec<String>>,
    specialization_index: BTreeMap<String, Vec<String>>,
    technology_index: BTreeMap<String, Vec<String>>,
}

impl CapabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from documents already in memory.
    pub fn from_documents(documents: &[Document]) -> (Self, Diagnostics) {
        let mut index = Self::new();
        let mut diagnostics = Diagnostics::new();
        for doc in documents {
            if let Some(record) = extractor::extract(doc, &mut diagnostics) {
                index.insert_or_report(record, &mut diagnostics);
            }
        }
        (index, diagnostics)
    }

    /// Scan every descriptor in `store`, replacing the current contents.
    ///
    /// A missing root is fatal and leaves the index empty. Everything else is
    /// per-document: a bad document is skipped and the scan continues.
    pub fn scan(&mut self, store: &DocumentStore) -> roster_core::Result<ScanReport> {
        self.clear();
        info!(root = ?store.root(), "scanning agent definitions");

        let (documents, mut diagnostics) = store.load()?;
        let (index, extraction) = Self::from_documents(&documents);
        diagnostics.extend(extraction);
        *self = index;

        let report = ScanReport {
            indexed: self.len(),
            skipped: diagnostics.skipped(),
            diagnostics,
        };
        info!(indexed = report.indexed, skipped = report.skipped, "indexed agents");
        Ok(report)
    }

    /// Add a record. Returns `false`, leaving the index unchanged, when an
    /// agent with the same name is already indexed.
    pub fn insert(&mut self, record: CapabilityRecord) -> bool {
        if self.positions.contains_key(&record.name) {
            return false;
        }

        let name = record.name.clone();
        self.categories
            .entry(record.category.clone())
            .or_default()
            .push(name.clone());
        for spec in &record.specializations {
            push_unique(&mut self.specialization_index, spec, &name);
        }
        for tech in &record.technologies {
            push_unique(&mut self.technology_index, tech, &name);
        }

        self.positions.insert(name, self.records.len());
        self.records.push(record);
        true
    }

    fn insert_or_report(&mut self, record: CapabilityRecord, diagnostics: &mut Diagnostics) {
        let source = record.file_path.display().to_string();
        let name = record.name.clone();
        if self.insert(record) {
            debug!(agent = %name, path = %source, "indexed agent");
        } else {
            diagnostics.skip(source, format!("agent '{name}' already defined by an earlier document"));
        }
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn get(&self, name: &str) -> Option<&CapabilityRecord> {
        self.positions.get(name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// All records in document order.
    pub fn records(&self) -> &[CapabilityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }

    pub fn specialization_index(&self) -> &BTreeMap<String, Vec<String>> {
        &self.specialization_index
    }

    pub fn technology_index(&self) -> &BTreeMap<String, Vec<String>> {
        &self.technology_index
    }

    /// Rank every agent against `requirement`, best first, keeping document
    /// order among equal scores.
    pub fn find_agents(&self, requirement: &str, top_n: usize) -> Vec<(&CapabilityRecord, f64)> {
        let mut scored: Vec<_> = self
            .records
            .iter()
            .map(|rec| (rec, rec.matches_requirement(requirement)))
            .collect();
        // sort_by is stable, so ties stay in document order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);
        scored
    }

    pub fn find_by_specialization(&self, specialization: &str) -> &[String] {
        lookup(&self.specialization_index, &specialization.to_lowercase())
    }

    pub fn find_by_technology(&self, technology: &str) -> &[String] {
        lookup(&self.technology_index, &technology.to_lowercase())
    }

    pub fn find_by_category(&self, category: &str) -> &[String] {
        lookup(&self.categories, category)
    }

    /// Serializable view of the whole index.
    pub fn snapshot(&self) -> IndexSnapshot<'_> {
        IndexSnapshot {
            generated_at: Utc::now(),
            agents: self.records.iter().map(|r| (r.name.as_str(), r)).collect(),
            categories: &self.categories,
            specialization_index: &self.specialization_index,
            technology_index: &self.technology_index,
            stats: IndexStats {
                total_agents: self.records.len(),
                total_categories: self.categories.len(),
                total_specializations: self.specialization_index.len(),
                total_technologies: self.technology_index.len(),
            },
        }
    }

    /// Write the snapshot as pretty JSON.
    pub fn export_json(&self, path: &Path) -> roster_core::Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, json).map_err(|e| {
            roster_core::RosterError::Export(format!("cannot write {}: {}", path.display(), e))
        })?;
        info!(path = ?path, agents = self.len(), "exported capability index");
        Ok(())
    }
}

fn push_unique(map: &mut BTreeMap<String, Vec<String>>, tag: &str, name: &str) {
    let key = tag.trim().to_lowercase();
    if key.is_empty() {
        return;
    }
    let names = map.entry(key).or_default();
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

fn lookup<'a>(map: &'a BTreeMap<String, Vec<String>>, key: &str) -> &'a [String] {
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}

/// Read-only report of the index; nothing reads it back.
#[derive(Debug, Serialize)]
pub struct IndexSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    pub agents: BTreeMap<&'a str, &'a CapabilityRecord>,
    pub categories: &'a BTreeMap<String, Vec<String>>,
    pub specialization_index: &'a BTreeMap<String, Vec<String>>,
    pub technology_index: &'a BTreeMap<String, Vec<String>>,
    pub stats: IndexStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub total_agents: usize,
    pub total_categories: usize,
    pub total_specializations: usize,
    pub total_technologies: usize,
}
