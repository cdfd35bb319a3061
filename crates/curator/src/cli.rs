use clap::{Args, Parser, Subcommand};
use curator_core::SortPolicy;
use std::path::PathBuf;

/// curator - triage unresolved links in a markdown note vault
#[derive(Parser, Debug)]
#[command(name = "curator")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, global = true, env = "CURATOR_CONFIG", default_value = "curator.toml")]
    pub config: PathBuf,

    /// Vault root (overrides the config file)
    #[arg(long, global = true, env = "CURATOR_VAULT")]
    pub vault: Option<PathBuf>,

    /// Quiet mode - only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Which links to show and in what order.
#[derive(Args, Debug, Clone)]
pub struct Selection {
    /// Only links whose text contains this (case-insensitive)
    #[arg(long, default_value = "")]
    pub query: String,

    /// Sort order: frequency or alphabetical
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Maximum links to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

impl Selection {
    pub fn sort_policy(&self, fallback: SortPolicy) -> SortPolicy {
        self.sort.as_deref().map(SortPolicy::from).unwrap_or(fallback)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the vault and list unresolved links
    Scan {
        #[command(flatten)]
        selection: Selection,

        /// Do not group by folder
        #[arg(long)]
        flat: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview the notes a batch generation would create
    Plan {
        #[command(flatten)]
        selection: Selection,

        /// Prompt template name
        #[arg(short, long)]
        template: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List configured prompt templates
    Templates,
}
