use super::http::{build_http_client, send_chat, ChatCompletionRequest};
use super::{enforce_schema, ModelClient};
use crate::config::{OpenAiConfig, ResponseFormat};
use crate::error::{ClientError, ConfigError};
use crate::parser::{ResponseParser, StructuredResponse};
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes `/v1/chat/completions`: OpenAI,
/// Ollama, vLLM, LiteLLM and similar gateways.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
    parser: ResponseParser,
}

impl OpenAiClient {
    pub fn new(
        settings: &OpenAiConfig,
        api_key: String,
        timeout: Duration,
        parser: ResponseParser,
    ) -> Result<Self, ConfigError> {
        let url = format!(
            "{}/v1/chat/completions",
            settings.base_url.trim_end_matches('/')
        );
        Ok(Self {
            http: build_http_client(timeout)?,
            url,
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
            timeout,
            parser,
        })
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn name(&self) -> &'static str {
        "open_ai"
    }

    async fn review(&self, prompt: &Prompt) -> Result<StructuredResponse, ClientError> {
        let payload = ChatCompletionRequest::new(
            prompt,
            Some(self.model.clone()),
            self.temperature,
            self.parser.format() == ResponseFormat::Json,
        );

        let request = self.http.post(&self.url).bearer_auth(&self.api_key);
        let content = send_chat(request, &payload, self.timeout).await?;
        enforce_schema(&self.parser, content)
    }
}
