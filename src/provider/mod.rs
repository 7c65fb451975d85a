mod azure;
mod claude;
mod http;
mod openai;

pub use azure::AzureOpenAiClient;
pub use claude::ClaudeCliClient;
pub use openai::OpenAiClient;

use crate::config::{Config, ProviderKind};
use crate::error::{ClientError, ConfigError};
use crate::parser::{ResponseParser, StructuredResponse};
use crate::prompt::Prompt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A remote text-generation service that can judge one policy.
///
/// Implementations serialize the prompt for their wire contract, enforce the
/// response schema and translate provider failures into [`ClientError`]:
/// `Transport` for systemic problems, `Malformed` when the reply does not
/// match the agreed shape.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn review(&self, prompt: &Prompt) -> Result<StructuredResponse, ClientError>;
}

/// Apply the parsing rule to raw model text
pub(crate) fn enforce_schema(
    parser: &ResponseParser,
    raw: String,
) -> Result<StructuredResponse, ClientError> {
    parser
        .parse(&raw)
        .map_err(|source| ClientError::Malformed { raw, source })
}

/// Environment variable the configured provider reads its key from
pub fn api_key_env(config: &Config) -> Option<&str> {
    match config.provider {
        ProviderKind::OpenAi => Some(&config.providers.open_ai.api_key_env),
        ProviderKind::AzureOpenAi => Some(&config.providers.azure_open_ai.api_key_env),
        ProviderKind::ClaudeCli => None,
    }
}

/// Create a client for the configured provider.
///
/// The key is passed in rather than read here so clients stay constructible
/// with fakes and fixed settings.
pub fn create_client(
    config: &Config,
    api_key: Option<String>,
) -> Result<Arc<dyn ModelClient>, ConfigError> {
    let parser = ResponseParser::from_config(config);
    let timeout = Duration::from_secs(config.timeout_sec);

    let require_key = |env: &str| {
        api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(env.to_string()))
    };

    match config.provider {
        ProviderKind::OpenAi => {
            let settings = &config.providers.open_ai;
            let key = require_key(&settings.api_key_env)?;
            Ok(Arc::new(OpenAiClient::new(settings, key, timeout, parser)?))
        }
        ProviderKind::AzureOpenAi => {
            let settings = &config.providers.azure_open_ai;
            let key = require_key(&settings.api_key_env)?;
            Ok(Arc::new(AzureOpenAiClient::new(settings, key, timeout, parser)?))
        }
        ProviderKind::ClaudeCli => Ok(Arc::new(ClaudeCliClient {
            binary: config.providers.claude_cli.binary.clone(),
            model: config.providers.claude_cli.model.clone(),
            working_dir: config.target.clone(),
            timeout,
            parser,
        })),
    }
}
