use super::http::{build_http_client, send_chat, ChatCompletionRequest};
use super::{enforce_schema, ModelClient};
use crate::config::{AzureOpenAiConfig, ResponseFormat};
use crate::error::{ClientError, ConfigError};
use crate::parser::{ResponseParser, StructuredResponse};
use crate::prompt::Prompt;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    http: Client,
    url: String,
    api_key: String,
    temperature: f32,
    timeout: Duration,
    parser: ResponseParser,
}

impl AzureOpenAiClient {
    pub fn new(
        settings: &AzureOpenAiConfig,
        api_key: String,
        timeout: Duration,
        parser: ResponseParser,
    ) -> Result<Self, ConfigError> {
        let endpoint = settings
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("providers.azure_open_ai.endpoint"))?;

        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            settings.deployment,
            settings.api_version
        );

        Ok(Self {
            http: build_http_client(timeout)?,
            url,
            api_key,
            temperature: settings.temperature,
            timeout,
            parser,
        })
    }
}

#[async_trait]
impl ModelClient for AzureOpenAiClient {
    fn name(&self) -> &'static str {
        "azure_open_ai"
    }

    async fn review(&self, prompt: &Prompt) -> Result<StructuredResponse, ClientError> {
        // The deployment in the URL selects the model
        let payload = ChatCompletionRequest::new(
            prompt,
            None,
            self.temperature,
            self.parser.format() == ResponseFormat::Json,
        );

        let request = self.http.post(&self.url).header("api-key", &self.api_key);
        let content = send_chat(request, &payload, self.timeout).await?;
        enforce_schema(&self.parser, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ResponseConfig, VerdictScale};
    use crate::error::TransportError;
    use crate::parser::Verdict;
    use httpmock::prelude::*;
    use std::sync::Arc;

    fn settings(endpoint: String) -> AzureOpenAiConfig {
        AzureOpenAiConfig {
            endpoint: Some(endpoint),
            deployment: "deployment-name".into(),
            api_version: "2024-10-21".into(),
            ..AzureOpenAiConfig::default()
        }
    }

    fn client(endpoint: String) -> AzureOpenAiClient {
        let parser = ResponseParser::new(&ResponseConfig::default(), VerdictScale::default());
        AzureOpenAiClient::new(
            &settings(endpoint),
            "test-key".into(),
            Duration::from_secs(5),
            parser,
        )
        .unwrap()
    }

    fn prompt() -> Prompt {
        Prompt {
            policy_name: "Dependency Inversion Principle".into(),
            system: "system".into(),
            policy: "- Dependency Inversion Principle: ...".into(),
            corpus: Arc::from("File: app.py"),
            clarification: None,
        }
    }

    #[test]
    fn test_deployment_url() {
        let c = client("https://example.openai.azure.com/".into());
        assert_eq!(
            c.url,
            "https://example.openai.azure.com/openai/deployments/deployment-name/chat/completions?api-version=2024-10-21"
        );
    }

    #[tokio::test]
    #[ignore = "requires loopback networking"]
    async fn review_parses_successful_response() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/deployments/deployment-name/chat/completions")
                .query_param("api-version", "2024-10-21")
                .header("api-key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"choices":[{"message":{"content":"{\"verdict\":2,\"comment\":\"Handlers import the ORM\"}"}}]}"#);
        });

        let response = client(server.base_url()).review(&prompt()).await.unwrap();
        assert_eq!(response.verdict, Verdict::Scored(2));
        mock.assert();
    }

    #[tokio::test]
    #[ignore = "requires loopback networking"]
    async fn review_does_not_retry_rate_limits() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/openai/deployments/deployment-name/chat/completions");
            then.status(429).body("quota exceeded");
        });

        let err = client(server.base_url()).review(&prompt()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::RateLimited(_))
        ));
        mock.assert_hits(1);
    }
}
