//! # roster-progress
//!
//! Parses a shared progress log into [`ProgressEntry`] records and
//! aggregates them.
//!
//! A log mixes three layouts. Narrative entries are Markdown with labeled
//! fields under a `## DATE [TIME] - @agent: Title` heading. Structured
//! entries are a `---` delimited YAML block. Hybrid entries are a block
//! followed by a narrative part; block values win and the prose fills gaps.
//!
//! ```text
//! ## 2025-01-15 09:00 - @backend-architect: Fix login
//! **Status**: ✅ Complete
//! **Duration**: 2h 30m
//!
//! ---
//! timestamp: 2025-01-16 14:00
//! agent: qa-lead
//! status: in_progress
//! ---
//! ```

pub mod analytics;
pub mod entry;
pub mod export;
pub mod narrative;
pub mod parser;
pub mod report;
pub mod segment;

pub use analytics::{EntryFilter, ProgressSummary};
pub use entry::{Deliverable, EntryFormat, MetricValue, Metrics, ProgressEntry, Status};
pub use parser::{ProgressLog, detect_format, parse_file, parse_str};
