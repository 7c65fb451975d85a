//! Wire types and error translation shared by the chat-completions clients.

use crate::error::{ClientError, ConfigError, TransportError};
use crate::prompt::Prompt;
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("policyrev/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(ConfigError::HttpClient)
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatParam>,
}

impl ChatCompletionRequest {
    pub fn new(prompt: &Prompt, model: Option<String>, temperature: f32, json_mode: bool) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user_message(),
                },
            ],
            temperature,
            response_format: json_mode.then(|| ResponseFormatParam {
                kind: "json_object",
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormatParam {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Send a prepared request and return the assistant message text
pub async fn send_chat(
    request: RequestBuilder,
    payload: &ChatCompletionRequest,
    timeout: Duration,
) -> Result<String, ClientError> {
    let response = request
        .json(payload)
        .send()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, body).into());
    }

    let body = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout))?;

    let chat: ChatCompletionResponse =
        serde_json::from_str(&body).map_err(|source| ClientError::Malformed {
            raw: body.clone(),
            source: source.into(),
        })?;

    let content = chat
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .unwrap_or_default();
    debug!("Model replied with {} characters", content.len());
    Ok(content)
}

fn transport_error(err: reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else {
        TransportError::Http(err)
    }
}

/// Map a non-success HTTP status onto the transport taxonomy
pub fn classify_status(status: StatusCode, body: String) -> TransportError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportError::Auth {
            status: status.as_u16(),
            body,
        },
        StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited(body),
        _ => TransportError::Status {
            status: status.as_u16(),
            body,
        },
    }
}
