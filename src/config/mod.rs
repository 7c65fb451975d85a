mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use crate::policy::PolicySet;
use defaults::*;
use std::path::Path;

/// The only config layout this build understands
pub const CONFIG_VERSION: u32 = 1;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            target: default_target(),
            concurrency: default_concurrency(),
            timeout_sec: default_timeout_sec(),
            launch_delay_ms: default_launch_delay_ms(),
            max_corpus_chars: default_max_corpus_chars(),
            truncation: TruncationPolicy::default(),
            report_dir: None,
            provider: ProviderKind::default(),
            providers: ProvidersConfig::default(),
            scale: VerdictScale::default(),
            response: ResponseConfig::default(),
            collect: CollectConfig::default(),
            output: OutputConfig::default(),
            policies: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Validate the config, returning the policy set it declares
    pub fn validate(&self) -> Result<PolicySet, ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version, CONFIG_VERSION));
        }

        if self.scale.min > self.scale.max {
            return Err(ConfigError::InvalidScale {
                min: self.scale.min,
                max: self.scale.max,
            });
        }

        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }

        PolicySet::new(self.policies.clone())
    }

    /// Threshold under which results get a CI annotation
    pub fn annotate_below(&self) -> i64 {
        self.output.annotate_below.unwrap_or(self.scale.max)
    }
}
