//! # roster-cli
//!
//! Command-line interface for Roster.
//!
//! ## Commands
//!
//! - `roster agents`: Scan, search and report on agent descriptors
//! - `roster summaries`: Generate and search lightweight agent summaries
//! - `roster progress`: Summarize, filter and export the shared progress log
//! - `roster config`: Show the resolved configuration
//! - `roster completions`: Generate shell completions

pub mod commands;

pub use commands::Cli;
