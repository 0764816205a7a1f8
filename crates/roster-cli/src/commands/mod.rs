use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use console::style;
use std::path::PathBuf;

use roster_config::{ConfigLoader, RosterConfig, WarningSeverity};
use roster_progress::Status;

mod agents;
mod progress;
mod summaries;

/// Roster: agent capability index and progress log analytics
#[derive(Parser)]
#[command(name = "roster", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to roster.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level override (e.g. debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan agent descriptors, search them and recommend teams
    Agents {
        /// Agents directory (default from config)
        #[arg(short, long, global = true)]
        dir: Option<PathBuf>,

        #[command(subcommand)]
        action: AgentsAction,
    },
    /// Generate and search lightweight agent summaries
    Summaries {
        #[command(subcommand)]
        action: SummariesAction,
    },
    /// Summarize, filter and export the shared progress log
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
    /// Show current configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Only run validation and list its findings
        #[arg(long)]
        check: bool,
    },
    /// Show version and build info
    Version,
    /// Generate shell completions for bash, zsh, or fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum AgentsAction {
    /// Scan descriptors and list what was indexed or skipped
    Scan,
    /// Rank agents against a free-text requirement
    Find {
        requirement: String,
        /// Number of results (default from config)
        #[arg(short = 'n', long)]
        top: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Recommend a team for a project description
    Recommend {
        description: String,
        /// Maximum team size (default from config)
        #[arg(short, long)]
        max: Option<usize>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the capability report
    Report,
    /// Write the capability index snapshot as JSON
    Export {
        /// Output file
        #[arg(short, long, default_value = "agent_capabilities_index.json")]
        output: PathBuf,
    },
    /// Show everything known about one agent
    Details {
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List agents with a specialization
    BySpec { specialization: String },
    /// List agents using a technology
    ByTech { technology: String },
    /// List agents in a category
    ByCategory { category: String },
}

#[derive(Subcommand)]
enum SummariesAction {
    /// Write a .summary.yaml for every agent descriptor
    Generate {
        /// Agents directory (default from config)
        #[arg(long)]
        agents_dir: Option<PathBuf>,
        /// Output directory (default from config)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Overwrite existing summaries
        #[arg(long)]
        force: bool,
    },
    /// List agents in the summary directory
    List {
        /// Only agents in this category
        #[arg(long)]
        category: Option<String>,
        /// List categories instead of agents
        #[arg(long, conflicts_with = "category")]
        categories: bool,
    },
    /// Search summaries for a query
    Find {
        query: String,
        /// Maximum results
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
    /// Show one agent's summary
    Show {
        name: String,
        /// Print the full descriptor instead
        #[arg(long)]
        full: bool,
    },
    /// Show loader status and token estimates, optionally activating agents first
    Status {
        /// Load these agents' full definitions
        #[arg(long, num_args = 1..)]
        activate: Vec<String>,
        /// Drop these agents from the active set
        #[arg(long, num_args = 1..)]
        deactivate: Vec<String>,
        /// Print the token estimate as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProgressAction {
    /// Print the progress report
    Summary {
        #[command(flatten)]
        filter: ProgressFilterArgs,
        /// Print the summary statistics as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Export filtered entries to JSON and/or CSV
    Export {
        #[command(flatten)]
        filter: ProgressFilterArgs,
        /// Write entries as JSON to this file
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
        /// Write entries as CSV to this file
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,
        /// Do not print the report after exporting
        #[arg(long)]
        no_report: bool,
    },
}

#[derive(Args)]
struct ProgressFilterArgs {
    /// Progress log (default from config)
    file: Option<PathBuf>,
    /// Only entries by this agent
    #[arg(long)]
    agent: Option<String>,
    /// Only entries with this status (complete, in_progress, blocked, failed, paused, planned)
    #[arg(long, value_parser = parse_status)]
    status: Option<Status>,
    /// Only entries on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    start_date: Option<String>,
    /// Only entries on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    end_date: Option<String>,
}

fn parse_status(s: &str) -> std::result::Result<Status, String> {
    s.parse()
}

/// Accept only real calendar dates, returned in `YYYY-MM-DD` form.
fn parse_date(s: &str) -> std::result::Result<String, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|e| format!("invalid date `{s}` ({e}); expected YYYY-MM-DD"))
}

impl Cli {
    pub async fn run(self) -> roster_core::Result<()> {
        // Load config first so we can use it for log format
        let config_loader = ConfigLoader::load(self.config.as_deref())?;
        let config = config_loader.get();

        // --verbose > --quiet > --log-level > config
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            self.log_level.as_deref().unwrap_or(&config.logging.level)
        };
        init_tracing(&config, log_level);

        match self.command {
            Commands::Agents { dir, action } => agents::cmd_agents(config, dir, action).await,
            Commands::Summaries { action } => summaries::cmd_summaries(config, action).await,
            Commands::Progress { action } => progress::cmd_progress(config, action).await,
            Commands::Config { json, check } => {
                if check {
                    Self::cmd_config_check(&config)
                } else {
                    Self::cmd_config(&config, &config_loader, json)
                }
            }
            Commands::Version => Self::cmd_version(),
            Commands::Completions { shell } => Self::cmd_completions(shell),
        }
    }

    fn cmd_config(
        config: &RosterConfig,
        loader: &ConfigLoader,
        json: bool,
    ) -> roster_core::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            let source = if loader.path().exists() {
                loader.path().display().to_string()
            } else {
                format!("defaults ({} not found)", loader.path().display())
            };
            println!("{}", style(format!("# {source}")).dim());
            println!(
                "{}",
                toml::to_string_pretty(config)
                    .map_err(|e| roster_core::RosterError::Config(e.to_string()))?
            );
        }
        Ok(())
    }

    fn cmd_config_check(config: &RosterConfig) -> roster_core::Result<()> {
        // load() already rejected hard errors, so only warnings remain here
        let warnings = config.validate()?;
        if warnings.is_empty() {
            println!("✅ Configuration looks good");
            return Ok(());
        }

        let mut warn_count = 0;
        let mut info_count = 0;
        for w in &warnings {
            println!("  {w}");
            match w.severity {
                WarningSeverity::Warning => warn_count += 1,
                WarningSeverity::Info => info_count += 1,
                WarningSeverity::Error => {}
            }
        }
        println!();
        println!("  ⚠️  {warn_count} warnings, 💡 {info_count} suggestions");
        Ok(())
    }

    fn cmd_version() -> roster_core::Result<()> {
        println!("📇 Roster v{}", env!("CARGO_PKG_VERSION"));
        println!("   Rust edition: 2024");
        println!("   Target: {}", std::env::consts::ARCH);
        println!("   OS: {}", std::env::consts::OS);
        #[cfg(debug_assertions)]
        println!("   Profile: debug");
        #[cfg(not(debug_assertions))]
        println!("   Profile: release");
        Ok(())
    }

    fn cmd_completions(shell: Shell) -> roster_core::Result<()> {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "roster", &mut std::io::stdout());
        Ok(())
    }
}

fn init_tracing(config: &RosterConfig, log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format.as_str() {
        "json" => builder.json().with_target(true).init(),
        "compact" => builder.compact().with_target(false).init(),
        _ => builder.with_target(false).init(),
    }
}

/// Print skip diagnostics, and the rest too when `all` is set.
fn print_diagnostics(diagnostics: &roster_core::Diagnostics, all: bool) {
    for d in diagnostics.iter() {
        if all || d.severity == roster_core::Severity::Skip {
            eprintln!("  {}", style(d).dim());
        }
    }
}
