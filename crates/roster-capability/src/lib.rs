//! # roster-capability
//!
//! Turns agent descriptor documents into a searchable capability index.
//!
//! A descriptor is a Markdown file with an optional YAML header:
//!
//! ```markdown
//! ---
//! name: api-architect
//! description: Designs REST and GraphQL APIs
//! alwaysApply: false
//! capabilities:
//!   specializations: [api_design, backend]
//!   technologies: [OpenAPI, GraphQL]
//!   requires_agents: [security-auditor]
//! ---
//!
//! # API Architect
//! ...
//! ```
//!
//! Facets missing from the header are inferred from the document text. The
//! index ranks agents against free-text requirements, recommends small
//! teams, and writes lightweight summaries that a [`SummaryDirectory`] can
//! search without reading full descriptors.

pub mod directory;
pub mod extractor;
pub mod index;
pub mod inference;
pub mod record;
pub mod report;
pub mod summary;
pub mod team;

pub use directory::{DirectoryEntry, SummaryDirectory, TokenEstimate};
pub use index::{CapabilityIndex, IndexSnapshot, IndexStats, ScanReport};
pub use record::CapabilityRecord;
pub use summary::{AgentSummary, GenerateReport, generate_all};
pub use team::{SelectionReason, Team, TeamMember};
