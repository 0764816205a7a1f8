use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, maps to `roster.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub agents: AgentsConfig,
    pub progress: ProgressConfig,
    pub recommend: RecommendConfig,
    pub logging: LoggingConfig,
}

// ── Agents ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Root directory holding descriptor documents, one sub-directory per category.
    pub dir: PathBuf,
    /// File-name suffixes treated as descriptor documents.
    pub extensions: Vec<String>,
    /// Where generated `*.summary.yaml` files are written and read.
    pub summaries_dir: PathBuf,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("agents"),
            extensions: vec!["mdc".into()],
            summaries_dir: PathBuf::from("agents/summaries"),
        }
    }
}

// ── Progress ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Shared progress log parsed by `roster progress`.
    pub file: PathBuf,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("workspaces/SHARED_PROGRESS.md"),
        }
    }
}

// ── Recommendation ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Default team size cap for `roster agents recommend`.
    pub max_agents: usize,
    /// Default number of matches shown by `roster agents find`.
    pub top_n: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            max_agents: 5,
            top_n: 5,
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = match self.severity {
            WarningSeverity::Error => "❌",
            WarningSeverity::Warning => "⚠️ ",
            WarningSeverity::Info => "💡",
        };
        write!(f, "{} {}: {}", icon, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl RosterConfig {
    /// Validate the config and return the non-fatal findings.
    /// Any Error-severity finding fails validation with every error field
    /// and message.
    pub fn validate(&self) -> roster_core::Result<Vec<ConfigWarning>> {
        let mut warnings = Vec::new();

        // ── Descriptor extensions ───
        if self.agents.extensions.is_empty() {
            warnings.push(ConfigWarning {
                field: "agents.extensions".into(),
                message: "no descriptor extensions configured: scans will find nothing".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. [\"mdc\"]".into()),
            });
        } else if self.agents.extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
            warnings.push(ConfigWarning {
                field: "agents.extensions".into(),
                message: "empty extension would match every file".into(),
                severity: WarningSeverity::Error,
                hint: None,
            });
        }

        // ── Recommendation sizes ───
        if self.recommend.max_agents == 0 {
            warnings.push(ConfigWarning {
                field: "recommend.max_agents".into(),
                message: "max_agents is 0: recommended teams will always be empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 5".into()),
            });
        } else if self.recommend.max_agents > 20 {
            warnings.push(ConfigWarning {
                field: "recommend.max_agents".into(),
                message: format!("max_agents is {}: teams this large are rarely useful", self.recommend.max_agents),
                severity: WarningSeverity::Info,
                hint: None,
            });
        }
        if self.recommend.top_n == 0 {
            warnings.push(ConfigWarning {
                field: "recommend.top_n".into(),
                message: "top_n is 0: searches will return nothing".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Set to e.g. 5".into()),
            });
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // Check for hard errors
        let (errors, warnings): (Vec<_>, Vec<_>) = warnings
            .into_iter()
            .partition(|w| w.severity == WarningSeverity::Error);

        if !errors.is_empty() {
            let fields: Vec<&str> = errors.iter().map(|w| w.field.as_str()).collect();
            let reasons: Vec<&str> = errors.iter().map(|w| w.message.as_str()).collect();
            return Err(roster_core::RosterError::ConfigValidation {
                field: fields.join(", "),
                reason: reasons.join("; "),
            });
        }

        Ok(warnings)
    }
}
