use super::{enforce_schema, ModelClient};
use crate::error::{ClientError, TransportError};
use crate::parser::{ResponseParser, StructuredResponse};
use crate::prompt::Prompt;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

/// Runs the Claude Code CLI in print mode, prompt on stdin
pub struct ClaudeCliClient {
    pub binary: PathBuf,
    pub model: Option<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    pub parser: ResponseParser,
}

#[async_trait]
impl ModelClient for ClaudeCliClient {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn review(&self, prompt: &Prompt) -> Result<StructuredResponse, ClientError> {
        // Build command - use string for PATH lookup if not an absolute/relative path
        let binary_str = self.binary.to_string_lossy();
        let mut cmd = if binary_str.contains('/') || binary_str.contains('\\') {
            Command::new(&self.binary)
        } else {
            Command::new(binary_str.as_ref())
        };

        cmd.current_dir(&self.working_dir);

        // Ensure subscription auth is used (not API key)
        cmd.env_remove("ANTHROPIC_API_KEY");

        cmd.arg("-p").arg("--output-format").arg("json");
        if let Some(model) = &self.model {
            cmd.arg("--model").arg(model);
        }

        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let start = std::time::Instant::now();
        let mut child = cmd.spawn().map_err(TransportError::Io)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.flattened().as_bytes())
                .await
                .map_err(TransportError::Io)?;
            stdin.shutdown().await.map_err(TransportError::Io)?;
        }

        let output = tokio_timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
            .map_err(TransportError::Io)?;

        if !output.status.success() {
            return Err(TransportError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            }
            .into());
        }

        debug!(
            "claude_cli answered policy '{}' in {:?}",
            prompt.policy_name,
            start.elapsed()
        );
        enforce_schema(&self.parser, reply_text(&output.stdout))
    }
}

/// `--output-format json` wraps the model's text in `{"result": "...", ...}`
#[derive(Deserialize)]
struct CliEnvelope {
    result: String,
}

/// The model's own reply, without the CLI envelope
fn reply_text(stdout: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);
    match serde_json::from_str::<CliEnvelope>(stdout.trim()) {
        Ok(envelope) => envelope.result,
        Err(_) => stdout.into_owned(),
    }
}
