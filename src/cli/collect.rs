use crate::cli::CollectArgs;
use policyrev::collector::collect_corpus;
use policyrev::config::Config;
use policyrev::runner::ReviewSettings;
use tracing::info;

pub fn execute(args: CollectArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(target) = args.target {
        config.target = target;
    }

    let corpus = collect_corpus(&config.target, &config.collect)?;
    let document = corpus.render(&ReviewSettings::from_config(&config).project_name());
    info!(
        "{} files, {} characters, fingerprint {}",
        corpus.len(),
        document.chars().count(),
        corpus.fingerprint()
    );

    print!("{}", document);
    Ok(())
}
