use console::style;
use roster_config::RosterConfig;
use roster_core::RosterError;
use roster_progress::{EntryFilter, ProgressEntry, ProgressSummary, export, parse_file, report};

use super::{ProgressAction, ProgressFilterArgs, print_diagnostics};

pub(super) async fn cmd_progress(
    config: RosterConfig,
    action: ProgressAction,
) -> roster_core::Result<()> {
    match action {
        ProgressAction::Summary { filter, json } => {
            let entries = load_entries(&config, filter)?;
            if json {
                let summary = ProgressSummary::from_entries(&entries);
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", report::render(&entries));
            }
        }
        ProgressAction::Export {
            filter,
            json,
            csv,
            no_report,
        } => {
            let entries = load_entries(&config, filter)?;
            if json.is_none() && csv.is_none() {
                return Err(RosterError::Export(
                    "nothing to export: pass --json PATH and/or --csv PATH".into(),
                ));
            }
            if let Some(path) = json {
                export::write_json(&entries, &path)?;
                println!("✅ Exported {} entries to {}", entries.len(), path.display());
            }
            if let Some(path) = csv {
                export::write_csv(&entries, &path)?;
                println!("✅ Exported {} entries to {}", entries.len(), path.display());
            }
            if !no_report {
                println!("\n{}", report::render(&entries));
            }
        }
    }
    Ok(())
}

/// Parse the log and apply the filter. No surviving entries is an error.
fn load_entries(
    config: &RosterConfig,
    args: ProgressFilterArgs,
) -> roster_core::Result<Vec<ProgressEntry>> {
    let path = args.file.unwrap_or_else(|| config.progress.file.clone());
    let log = parse_file(&path)?;
    print_diagnostics(&log.diagnostics, false);

    let mut filter = EntryFilter::new().dates(args.start_date, args.end_date);
    if let Some(agent) = args.agent {
        filter = filter.agent(agent);
    }
    if let Some(status) = args.status {
        filter = filter.status(status);
    }

    let parsed = log.entries.len();
    let entries = filter.apply(log.entries);
    tracing::debug!(parsed, kept = entries.len(), "filtered progress entries");

    if entries.is_empty() {
        let what = if filter.is_empty() {
            "no entries found".to_string()
        } else {
            format!("no entries match the filter ({parsed} parsed)")
        };
        return Err(RosterError::Parse(format!("{}: {what}", path.display())));
    }
    if !filter.is_empty() {
        eprintln!(
            "  {}",
            style(format!("{} of {parsed} entries match", entries.len())).dim()
        );
    }
    Ok(entries)
}
