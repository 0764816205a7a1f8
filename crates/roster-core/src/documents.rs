use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::diagnostics::Diagnostics;
use crate::error::{Result, RosterError};

/// One source file, read into memory.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    /// Name of the directory that directly contains the file.
    pub category: String,
    pub content: String,
}

impl Document {
    /// Read a single document from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RosterError::Document {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_text(path, content))
    }

    /// Build a document from text already in memory.
    pub fn from_text(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let path = path.into();
        let category = category_of(&path);
        Self {
            path,
            category,
            content: content.into(),
        }
    }
}

/// Enumerates source documents under a root directory.
///
/// Files are selected by file-name suffix (`"mdc"` matches `*.mdc`,
/// `"summary.yaml"` matches `*.summary.yaml`) and returned sorted by path so
/// that every scan sees the same document order.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
    suffixes: Vec<String>,
    recursive: bool,
}

impl DocumentStore {
    pub fn new(root: impl Into<PathBuf>, suffixes: &[&str]) -> Self {
        Self {
            root: root.into(),
            suffixes: suffixes.iter().map(|s| s.trim_start_matches('.').to_string()).collect(),
            recursive: true,
        }
    }

    /// Only look at files directly inside the root.
    pub fn shallow(mut self) -> Self {
        self.recursive = false;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List matching files. A missing root is fatal.
    pub fn enumerate(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(RosterError::DocumentRoot(self.root.clone()));
        }

        let mut walker = WalkDir::new(&self.root).sort_by_file_name();
        if !self.recursive {
            walker = walker.max_depth(1);
        }

        let mut paths = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && self.matches(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        info!(root = ?self.root, count = paths.len(), "enumerated documents");
        Ok(paths)
    }

    /// Read every matching file. Unreadable files are skipped, not fatal.
    pub fn load(&self) -> Result<(Vec<Document>, Diagnostics)> {
        let mut diagnostics = Diagnostics::new();
        let mut documents = Vec::new();

        for path in self.enumerate()? {
            match Document::read(&path) {
                Ok(doc) => documents.push(doc),
                Err(e) => diagnostics.skip(path.display().to_string(), e.to_string()),
            }
        }

        Ok((documents, diagnostics))
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.suffixes.iter().any(|suffix| {
            name.len() > suffix.len() + 1
                && name.ends_with(suffix.as_str())
                && name[..name.len() - suffix.len()].ends_with('.')
        })
    }
}

fn category_of(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn enumerates_recursively_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("backend/zeta.mdc"), "z");
        write(&dir.path().join("backend/alpha.mdc"), "a");
        write(&dir.path().join("frontend/ui.mdc"), "u");
        write(&dir.path().join("frontend/README.md"), "ignored");

        let store = DocumentStore::new(dir.path(), &["mdc"]);
        let names: Vec<_> = store
            .enumerate()
            .unwrap()
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["backend/alpha.mdc", "backend/zeta.mdc", "frontend/ui.mdc"]);
    }

    #[test]
    fn category_is_parent_directory() {
        let doc = Document::from_text("/agents/security/auditor.mdc", "");
        assert_eq!(doc.category, "security");
    }

    #[test]
    fn missing_root_is_fatal() {
        let store = DocumentStore::new("/nonexistent/roster/agents", &["mdc"]);
        assert!(matches!(store.enumerate(), Err(RosterError::DocumentRoot(_))));
    }

    #[test]
    fn shallow_store_ignores_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("api.summary.yaml"), "name: api");
        write(&dir.path().join("nested/db.summary.yaml"), "name: db");
        write(&dir.path().join("plain.yaml"), "name: plain");

        let store = DocumentStore::new(dir.path(), &["summary.yaml"]).shallow();
        let paths = store.enumerate().unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("api.summary.yaml"));
    }

    #[test]
    fn load_reads_content() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ops/deploy.mdc"), "---\nname: deploy\n---\n");

        let (docs, diags) = DocumentStore::new(dir.path(), &[".mdc"]).load().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].category, "ops");
        assert!(docs[0].content.contains("name: deploy"));
        assert!(diags.is_empty());
    }
}
