mod cli;
mod config;
mod report;
mod vault;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, Selection};
use config::Config;
use curator_core::planner::plan_notes;
use curator_core::{Curator, ViewOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::vault::FsCorpus;

fn init_tracing(quiet: bool) {
    let default = if quiet {
        "warn"
    } else {
        "curator=info,curator_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn view_options(selection: &Selection, config: &Config, grouped: bool) -> ViewOptions {
    ViewOptions {
        query: selection.query.clone(),
        sort: selection.sort_policy(config.view.sort),
        limit: selection.limit,
        group_by_folder: grouped,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    if let Err(e) = run(cli).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)?;
    let root: PathBuf = cli.vault.clone().unwrap_or_else(|| config.vault.root.clone());

    let curator = Curator::new(FsCorpus::new(root, config.vault.exclude.clone()));

    match cli.command {
        Commands::Scan {
            selection,
            flat,
            json,
        } => {
            let result = curator
                .refresh()
                .await
                .with_context(|| format!("scan of {} failed", curator.corpus().root().display()))?;
            let options = view_options(&selection, &config, config.view.group_by_folder && !flat);
            let view = options.project(&result.entries);
            tracing::info!("Showing {} of {} unresolved links", view.link_count(), result.len());

            if json {
                let report = report::ScanReport {
                    stats: &result.stats,
                    links: &view,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::render_summary(&result.stats, result.len()));
                print!("{}", report::render_view(&view));
            }
        }

        Commands::Plan {
            selection,
            template,
            json,
        } => {
            let generation = &config.generation;
            let template = generation.template(template.as_deref()).with_context(|| {
                format!(
                    "no prompt template named {:?}",
                    template.as_deref().or(generation.default_template.as_deref()).unwrap_or("")
                )
            })?;

            let result = curator
                .snapshot()
                .await
                .with_context(|| format!("scan of {} failed", curator.corpus().root().display()))?;
            let selected = view_options(&selection, &config, false).select(&result.entries);

            let plans = plan_notes(
                selected,
                template,
                &generation.new_note_folder,
                generation.unmatched_placeholders,
            )?;
            tracing::info!("Planned {} notes with template {:?}", plans.len(), template.name);

            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                print!("{}", report::render_plans(&plans));
            }
        }

        Commands::Templates => {
            print!(
                "{}",
                report::render_templates(
                    &config.generation.templates,
                    config.generation.default_template.as_deref()
                )
            );
        }
    }

    Ok(())
}
