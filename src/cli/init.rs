use crate::cli::InitArgs;
use anyhow::{bail, Context};
use policyrev::config::Config;
use policyrev::policy::starter_policies;

const HEADER: &str = "\
# policyrev configuration
# Run `policyrev schema` for the full JSON Schema of this file.
";

pub fn execute(args: InitArgs) -> anyhow::Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }

    let config = Config {
        policies: starter_policies(),
        ..Config::default()
    };
    let yaml = serde_yaml::to_string(&config)?;

    std::fs::write(&args.path, format!("{}{}", HEADER, yaml))
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!(
        "Wrote {} with {} starter policies",
        args.path.display(),
        config.policies.len()
    );
    Ok(())
}
