//! # roster-core
//!
//! Shared vocabulary for the Roster workspace: the unified error type, the
//! diagnostics collector that every scan and parse returns, the document
//! store that enumerates source files under a root, and the front-matter
//! extractor used by both the capability and progress pipelines.

pub mod diagnostics;
pub mod documents;
pub mod error;
pub mod frontmatter;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use documents::{Document, DocumentStore};
pub use error::{Result, RosterError};
pub use frontmatter::{FrontMatter, DELIMITER};
