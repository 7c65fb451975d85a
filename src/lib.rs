//! Review a codebase against named policies with a language model.
//!
//! The pipeline is linear: [`collector`] reads the target into a corpus,
//! [`runner`] asks a [`ModelClient`] to judge each policy, and [`output`]
//! renders the ordered results.

pub mod collector;
pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod policy;
pub mod prompt;
pub mod provider;
pub mod runner;

pub use config::Config;
pub use error::PolicyrevError;
pub use policy::{Policy, PolicySet};
pub use provider::ModelClient;
pub use runner::{ReviewReport, ReviewResult};

use collector::collect_corpus;
use parser::ResponseParser;
use runner::{Orchestrator, ReviewSettings, RunPhase};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Validate `config`, collect `root` and review every declared policy.
///
/// Fails before any model call on config or collection errors, and aborts
/// on the first transport failure.
pub async fn run_review(
    config: &Config,
    root: &Path,
    client: Arc<dyn ModelClient>,
) -> Result<ReviewReport, PolicyrevError> {
    let policies = config.validate()?;

    info!("[{}] {}", RunPhase::Collecting, root.display());
    let corpus = collect_corpus(root, &config.collect)?;

    let settings = ReviewSettings {
        target: root.to_path_buf(),
        ..ReviewSettings::from_config(config)
    };
    let orchestrator = Orchestrator::new(client, &ResponseParser::from_config(config), settings);
    let report = orchestrator.review(&corpus, &policies).await?;

    info!(
        "[{}] {} policies in {:.1}s",
        RunPhase::Done,
        report.results.len(),
        report.total_duration.as_secs_f64()
    );
    Ok(report)
}
