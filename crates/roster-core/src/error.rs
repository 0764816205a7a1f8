use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the Roster workspace.
///
/// Only fatal conditions travel through this type. A single malformed
/// document or log entry is never an error; it becomes a [`Diagnostic`]
/// instead.
///
/// [`Diagnostic`]: crate::Diagnostic
#[derive(Error, Debug)]
pub enum RosterError {
    // ── Document errors ────────────────────────────────────────
    #[error("document root not found: {}", .0.display())]
    DocumentRoot(PathBuf),

    #[error("failed to read document {}: {reason}", .path.display())]
    Document { path: PathBuf, reason: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Output errors ──────────────────────────────────────────
    #[error("export failed: {0}")]
    Export(String),

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
