use console::style;
use roster_capability::{SummaryDirectory, generate_all};
use roster_config::RosterConfig;
use roster_core::DocumentStore;

use super::{SummariesAction, print_diagnostics};

pub(super) async fn cmd_summaries(
    config: RosterConfig,
    action: SummariesAction,
) -> roster_core::Result<()> {
    match action {
        SummariesAction::Generate {
            agents_dir,
            output_dir,
            force,
        } => {
            let agents_dir = agents_dir.unwrap_or_else(|| config.agents.dir.clone());
            let output_dir = output_dir.unwrap_or_else(|| config.agents.summaries_dir.clone());
            let suffixes: Vec<&str> = config.agents.extensions.iter().map(String::as_str).collect();
            let store = DocumentStore::new(&agents_dir, &suffixes);

            let report = generate_all(&store, &output_dir, force)?;
            print_diagnostics(&report.diagnostics, false);
            println!("✅ Generated {} summaries in {}", report.generated, output_dir.display());
            if report.existing > 0 {
                println!(
                    "   {} already present (use --force to overwrite)",
                    report.existing
                );
            }
            if report.failed > 0 {
                println!("   {} {} failed", style("⚠").yellow(), report.failed);
            }
        }
        SummariesAction::List {
            category,
            categories,
        } => {
            let directory = load(&config);
            if categories {
                for category in directory.list_categories() {
                    println!("  {}", style(category).cyan());
                }
                return Ok(());
            }
            let names = directory.list_agents(category.as_deref());
            if names.is_empty() {
                println!("No agents found.");
                return Ok(());
            }
            println!("{}\n", style(format!("Agents ({}):", names.len())).bold());
            for name in names {
                if let Some(entry) = directory.entry(name) {
                    println!("  {} {}", style(name).cyan(), style(&entry.category).dim());
                    if !entry.description.is_empty() {
                        println!("    {}", entry.description);
                    }
                }
            }
        }
        SummariesAction::Find { query, limit } => {
            let mut directory = load(&config);
            let results = directory.find(&query, limit);
            if results.is_empty() {
                println!("No agents found.");
            }
            for (name, score) in results {
                println!("  {} {score:.1}", style(name).cyan());
            }
        }
        SummariesAction::Show { name, full } => {
            let mut directory = load(&config);
            if full {
                println!("{}", directory.load_full_definition(&name)?);
            } else {
                print!("{}", directory.summary(&name)?.to_yaml()?);
            }
        }
        SummariesAction::Status {
            activate,
            deactivate,
            json,
        } => {
            let mut directory = load(&config);
            for name in &activate {
                match directory.activate(name) {
                    Ok(()) => println!("✅ Activated {}", style(name).cyan()),
                    Err(e) => println!("❌ {e}"),
                }
            }
            for name in &deactivate {
                if directory.deactivate(name) {
                    println!("✅ Deactivated {}", style(name).cyan());
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&directory.token_estimate())?);
            } else {
                println!("{}", directory.status());
            }
        }
    }
    Ok(())
}

fn load(config: &RosterConfig) -> SummaryDirectory {
    let (directory, diagnostics) = SummaryDirectory::load(&config.agents.summaries_dir);
    print_diagnostics(&diagnostics, true);
    directory
}
