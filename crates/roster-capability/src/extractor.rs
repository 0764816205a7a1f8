//! Descriptor document → [`CapabilityRecord`].
//!
//! Header fields win. Facets missing from the header's `capabilities` block
//! are inferred from the whole document text. A document with no usable
//! header or no `name` is skipped; the caller's scan continues.

use serde_yaml::{Mapping, Value};

use roster_core::frontmatter::{scalar_to_string, value_to_list};
use roster_core::{Diagnostics, Document, FrontMatter};

use crate::inference::{extract_keywords, infer_specializations, infer_technologies};
use crate::record::{
    CapabilityRecord, default_avg_task_duration_hours, default_max_parallel_tasks, default_version,
};

/// Extract one capability record, recording why when the document is skipped.
pub fn extract(doc: &Document, diagnostics: &mut Diagnostics) -> Option<CapabilityRecord> {
    let source = doc.path.display().to_string();

    let fm = match FrontMatter::inspect(&doc.content) {
        Ok(fm) => fm,
        Err(reason) => {
            diagnostics.skip(source, reason.to_string());
            return None;
        }
    };

    let Some(name) = fm.name() else {
        diagnostics.skip(source, "front-matter has no name");
        return None;
    };

    let mut record = CapabilityRecord::new(name, doc.category.clone());
    record.file_path = doc.path.clone();
    record.description = fm.get_str("description").unwrap_or_default();
    record.always_apply = fm
        .get("alwaysApply")
        .or_else(|| fm.get("always_apply"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let empty = Mapping::new();
    let caps = match fm.get("capabilities") {
        Some(Value::Mapping(map)) => map,
        Some(Value::Null) | None => &empty,
        Some(_) => {
            diagnostics.warn(&source, "capabilities is not a mapping, ignoring it");
            &empty
        }
    };
    let fields = HeaderFields { caps, source: &source };

    record.version = fields.string("version").unwrap_or_else(default_version);
    record.file_operations = fields.list("file_operations").unwrap_or_default();
    record.command_execution = fields.list("command_execution").unwrap_or_default();
    record.external_access = fields.list("external_access").unwrap_or_default();
    record.methodologies = fields.list("methodologies").unwrap_or_default();
    record.requires_agents = fields.list("requires_agents").unwrap_or_default();
    record.works_well_with = fields.list("works_well_with").unwrap_or_default();
    record.provides_for = fields.list("provides_for").unwrap_or_default();

    record.specializations = fields
        .list("specializations")
        .unwrap_or_else(|| infer_specializations(&doc.content));
    record.technologies = fields
        .list("technologies")
        .unwrap_or_else(|| infer_technologies(&doc.content));

    record.consultation_available = fields.flag("consultation_available", true, diagnostics);
    record.max_parallel_tasks = fields.max_parallel_tasks(diagnostics);
    record.avg_task_duration_hours = fields.avg_task_duration_hours(diagnostics);

    record.keywords = extract_keywords(&record.description);

    Some(record)
}

/// Typed access to the `capabilities` mapping of a header.
struct HeaderFields<'a> {
    caps: &'a Mapping,
    source: &'a str,
}

impl HeaderFields<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.caps.get(key).filter(|v| !v.is_null())
    }

    fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    /// `Some` whenever the key is present, even with an empty list.
    fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(value_to_list)
    }

    fn flag(&self, key: &str, default: bool, diagnostics: &mut Diagnostics) -> bool {
        match self.get(key) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                diagnostics.warn(
                    self.source,
                    format!("{key} is not a boolean ({other:?}), using {default}"),
                );
                default
            }
        }
    }

    fn max_parallel_tasks(&self, diagnostics: &mut Diagnostics) -> u32 {
        let default = default_max_parallel_tasks();
        match self.get("max_parallel_tasks") {
            None => default,
            Some(v) => match v.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(n) if n >= 1 => n,
                _ => {
                    diagnostics.warn(
                        self.source,
                        format!("max_parallel_tasks must be an integer >= 1, using {default}"),
                    );
                    default
                }
            },
        }
    }

    fn avg_task_duration_hours(&self, diagnostics: &mut Diagnostics) -> f64 {
        let default = default_avg_task_duration_hours();
        match self.get("avg_task_duration_hours") {
            None => default,
            Some(v) => match v.as_f64() {
                Some(h) if h > 0.0 && h.is_finite() => h,
                _ => {
                    diagnostics.warn(
                        self.source,
                        format!("avg_task_duration_hours must be a positive number, using {default}"),
                    );
                    default
                }
            },
        }
    }
}
