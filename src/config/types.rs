use crate::policy::Policy;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Root directory of the codebase under review
    #[serde(default = "default_target")]
    pub target: PathBuf,

    /// Maximum model calls in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-call timeout; an elapsed timeout aborts the run
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    /// Pause between launching consecutive policy reviews
    #[serde(default = "default_launch_delay_ms")]
    pub launch_delay_ms: u64,

    /// Upper bound on the corpus text sent with each prompt
    #[serde(default = "default_max_corpus_chars")]
    pub max_corpus_chars: usize,

    #[serde(default)]
    pub truncation: TruncationPolicy,

    /// Write Markdown and JSON reports under this directory
    #[serde(default)]
    pub report_dir: Option<PathBuf>,

    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub scale: VerdictScale,

    #[serde(default)]
    pub response: ResponseConfig,

    #[serde(default)]
    pub collect: CollectConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub policies: Vec<Policy>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TruncationPolicy {
    /// Cut the corpus at the limit and log a warning
    #[default]
    Truncate,
    /// Abort before any model call
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    AzureOpenAi,
    ClaudeCli,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAi => write!(f, "open_ai"),
            ProviderKind::AzureOpenAi => write!(f, "azure_open_ai"),
            ProviderKind::ClaudeCli => write!(f, "claude_cli"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub open_ai: OpenAiConfig,

    #[serde(default)]
    pub azure_open_ai: AzureOpenAiConfig,

    #[serde(default)]
    pub claude_cli: ClaudeCliConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OpenAiConfig {
    /// Any endpoint serving `/v1/chat/completions`
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            api_key_env: default_openai_key_env(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AzureOpenAiConfig {
    /// e.g. `https://my-resource.openai.azure.com/`
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_azure_deployment")]
    pub deployment: String,

    #[serde(default = "default_azure_api_version")]
    pub api_version: String,

    #[serde(default = "default_azure_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            deployment: default_azure_deployment(),
            api_version: default_azure_api_version(),
            api_key_env: default_azure_key_env(),
            temperature: default_temperature(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClaudeCliConfig {
    #[serde(default = "default_claude_binary")]
    pub binary: PathBuf,

    #[serde(default)]
    pub model: Option<String>,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            model: None,
        }
    }
}

/// Inclusive bounds of the verdict score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct VerdictScale {
    #[serde(default = "default_scale_min")]
    pub min: i64,

    #[serde(default = "default_scale_max")]
    pub max: i64,
}

impl Default for VerdictScale {
    fn default() -> Self {
        Self {
            min: default_scale_min(),
            max: default_scale_max(),
        }
    }
}

impl VerdictScale {
    pub fn contains(&self, verdict: i64) -> bool {
        (self.min..=self.max).contains(&verdict)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{"verdict": 4, "comment": "..."}`
    #[default]
    Json,
    /// `<verdict>4</verdict><comment>...</comment>`
    Tagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct ResponseConfig {
    #[serde(default)]
    pub format: ResponseFormat,

    /// JSON key or tag name carrying the score
    #[serde(default = "default_verdict_key")]
    pub verdict_key: String,

    /// JSON key or tag name carrying the rationale
    #[serde(default = "default_comment_key")]
    pub comment_key: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            format: ResponseFormat::default(),
            verdict_key: default_verdict_key(),
            comment_key: default_comment_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CollectConfig {
    /// Globs a file must match to be collected (empty = all)
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub include_hidden: bool,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: default_exclude(),
            include_hidden: false,
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Markdown,
    Json,
    Github,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Annotate results scoring below this value (defaults to the scale max)
    #[serde(default)]
    pub annotate_below: Option<i64>,
}
