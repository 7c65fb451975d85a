pub mod collect;
pub mod init;
pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use policyrev::config::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "policyrev")]
#[command(
    author,
    version,
    about = "Review a codebase against architectural policies with an LLM"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Review the target against every configured policy
    Run(RunArgs),

    /// Print the corpus document the model would see
    Collect(CollectArgs),

    /// Write a starter config with example policies
    Init(InitArgs),

    /// Print JSON Schema for config validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, default_value = "policyrev.yaml")]
    pub config: PathBuf,

    /// Override the directory to review
    #[arg(long)]
    pub target: Option<PathBuf>,

    /// Override max parallel model calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Override the corpus character limit
    #[arg(long)]
    pub max_corpus_chars: Option<usize>,

    /// Override console output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write Markdown and JSON reports under this directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Show plan without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct CollectArgs {
    /// Config file for collection settings (defaults apply if omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory to collect
    #[arg(long)]
    pub target: Option<PathBuf>,
}

#[derive(Parser, Clone)]
pub struct InitArgs {
    /// Where to write the config
    #[arg(long, default_value = "policyrev.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
