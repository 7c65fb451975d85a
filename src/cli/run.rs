use crate::cli::RunArgs;
use policyrev::collector::collect_corpus;
use policyrev::config::Config;
use policyrev::output::{dated_report_dir, render, write_report};
use policyrev::policy::PolicySet;
use policyrev::provider::{api_key_env, create_client};
use policyrev::runner::{ReviewSettings, RunPhase};
use policyrev::run_review;
use tracing::info;

/// Exit status reflects only operational failures, never verdicts
pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(target) = args.target {
        config.target = target;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(limit) = args.max_corpus_chars {
        config.max_corpus_chars = limit;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(report_dir) = args.report_dir {
        config.report_dir = Some(report_dir);
    }

    let policies = config.validate()?;

    if args.dry_run {
        info!("DRY RUN - no model calls will be made");
        print_execution_plan(&config, &policies)?;
        return Ok(());
    }

    // Read the key once; clients never touch the environment
    let api_key = api_key_env(&config).and_then(|var| std::env::var(var).ok());
    let client = create_client(&config, api_key)?;

    let target = config.target.clone();
    let report = run_review(&config, &target, client).await?;

    info!("[{}] {:?}", RunPhase::Rendering, config.output.format);
    print!(
        "{}",
        render(&report, config.output.format, config.annotate_below())?
    );

    if let Some(base) = &config.report_dir {
        let report_dir = dated_report_dir(base);
        write_report(&report_dir, &report)?;
        info!("Reports written to {:?}", report_dir);
    }

    Ok(())
}

fn print_execution_plan(config: &Config, policies: &PolicySet) -> anyhow::Result<()> {
    let corpus = collect_corpus(&config.target, &config.collect)?;
    let settings = ReviewSettings::from_config(config);
    let characters = corpus.render(&settings.project_name()).chars().count();

    println!("\n=== Execution Plan ===\n");
    println!("Target: {:?}", config.target);
    println!("Provider: {}", config.provider);
    println!("Concurrency: {}", config.concurrency);
    println!("Files: {}", corpus.len());
    println!(
        "Corpus: {} characters, {}",
        characters,
        settings.corpus_fit(characters)
    );
    if let Some(ref report_dir) = config.report_dir {
        println!("Report dir: {:?}", report_dir);
    }

    println!("\nPolicies to review:");
    for policy in policies {
        println!("  - {}", policy.name);
    }
    println!();

    Ok(())
}
