use std::path::PathBuf;

use console::style;
use roster_capability::CapabilityIndex;
use roster_config::RosterConfig;
use roster_core::{DocumentStore, RosterError};

use super::{AgentsAction, print_diagnostics};

pub(super) async fn cmd_agents(
    config: RosterConfig,
    dir: Option<PathBuf>,
    action: AgentsAction,
) -> roster_core::Result<()> {
    let dir = dir.unwrap_or_else(|| config.agents.dir.clone());
    let verbose_scan = matches!(action, AgentsAction::Scan);
    let index = load_index(&config, dir.clone(), verbose_scan).await?;

    match action {
        AgentsAction::Scan => {
            println!(
                "{} {} agents across {} categories in {}",
                style("Indexed").bold(),
                index.len(),
                index.categories().len(),
                dir.display()
            );
            for (category, agents) in index.categories() {
                println!("  {} ({})", style(category).cyan(), agents.len());
                for name in agents {
                    println!("    {name}");
                }
            }
        }
        AgentsAction::Find {
            requirement,
            top,
            json,
        } => {
            let top = top.unwrap_or(config.recommend.top_n);
            let matches = index.find_agents(&requirement, top);
            if json {
                let rows: Vec<serde_json::Value> = matches
                    .iter()
                    .map(|(r, score)| {
                        serde_json::json!({
                            "agent": r.name,
                            "score": (score * 1000.0).round() / 1000.0,
                            "category": r.category,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if matches.is_empty() {
                println!("No agents found.");
            } else {
                println!("{}\n", style(format!("Matches for \"{requirement}\":")).bold());
                for (record, score) in matches {
                    println!(
                        "  {} {:.3}  {}",
                        style(&record.name).cyan(),
                        score,
                        style(&record.category).dim()
                    );
                    if !record.description.is_empty() {
                        println!("    {}", record.description);
                    }
                }
            }
        }
        AgentsAction::Recommend {
            description,
            max,
            json,
        } => {
            let max = max.unwrap_or(config.recommend.max_agents);
            let team = index.recommend_team(&description, max);
            if json {
                println!("{}", serde_json::to_string_pretty(&team)?);
            } else if team.is_empty() {
                println!("No agents matched \"{description}\".");
            } else {
                println!(
                    "{}\n",
                    style(format!("Recommended team ({} of max {max}):", team.len())).bold()
                );
                for member in &team.members {
                    println!(
                        "  {} {:.3}  {}  ({})",
                        style(&member.agent).cyan(),
                        member.match_score,
                        style(&member.category).dim(),
                        member.reason
                    );
                    if !member.new_coverage.is_empty() {
                        println!("    covers: {}", member.new_coverage.join(", "));
                    }
                }
                println!("\n  Estimated effort: {:.1} hours", team.estimated_hours());
            }
        }
        AgentsAction::Report => println!("{}", index.report()),
        AgentsAction::Export { output } => {
            index.export_json(&output)?;
            println!("✅ Exported {} agents to {}", index.len(), output.display());
        }
        AgentsAction::Details { name, json } => {
            let record = index
                .get(&name)
                .ok_or_else(|| RosterError::NotFound {
                    kind: "agent",
                    name: name.clone(),
                })?;
            if json {
                println!("{}", serde_json::to_string_pretty(record)?);
                return Ok(());
            }
            println!("{} v{}", style(&record.name).bold(), record.version);
            println!("  {}", record.description);
            println!("  Category: {}", record.category);
            let lists = [
                ("Specializations", &record.specializations),
                ("Technologies", &record.technologies),
                ("Methodologies", &record.methodologies),
                ("Requires", &record.requires_agents),
                ("Works well with", &record.works_well_with),
                ("Provides for", &record.provides_for),
            ];
            for (label, values) in lists {
                if !values.is_empty() {
                    println!("  {label}: {}", values.join(", "));
                }
            }
            println!(
                "  Consultation: {}  Always apply: {}",
                yes_no(record.consultation_available),
                yes_no(record.always_apply)
            );
            println!(
                "  Parallel tasks: {}  Avg duration: {}h",
                record.max_parallel_tasks, record.avg_task_duration_hours
            );
            println!("  File: {}", record.file_path.display());
        }
        AgentsAction::BySpec { specialization } => {
            print_names(index.find_by_specialization(&specialization));
        }
        AgentsAction::ByTech { technology } => {
            print_names(index.find_by_technology(&technology));
        }
        AgentsAction::ByCategory { category } => {
            print_names(index.find_by_category(&category));
        }
    }

    Ok(())
}

async fn load_index(
    config: &RosterConfig,
    dir: PathBuf,
    show_all: bool,
) -> roster_core::Result<CapabilityIndex> {
    let extensions = config.agents.extensions.clone();
    let (index, report) = tokio::task::spawn_blocking(move || {
        let suffixes: Vec<&str> = extensions.iter().map(String::as_str).collect();
        let store = DocumentStore::new(dir, &suffixes);
        let mut index = CapabilityIndex::new();
        let report = index.scan(&store)?;
        Ok::<_, RosterError>((index, report))
    })
    .await
    .map_err(|e| RosterError::Other(anyhow::anyhow!("scan task failed: {e}")))??;

    print_diagnostics(&report.diagnostics, show_all);
    if report.skipped > 0 {
        eprintln!("  {} {} descriptors skipped", style("⚠").yellow(), report.skipped);
    }
    Ok(index)
}

fn print_names(names: &[String]) {
    if names.is_empty() {
        println!("No agents found.");
    }
    for name in names {
        println!("  {name}");
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
