//! # roster-config
//!
//! Configuration system for Roster. Reads from `roster.toml` and environment
//! variables; CLI flags override both at the call site.

pub mod schema;
pub mod loader;

pub use schema::RosterConfig;
pub use schema::{AgentsConfig, ConfigWarning, LoggingConfig, ProgressConfig, RecommendConfig, WarningSeverity};
pub use loader::ConfigLoader;
