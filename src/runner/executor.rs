use crate::error::{ClientError, TransportError};
use crate::parser::{StructuredResponse, Verdict};
use crate::prompt::{Prompt, PromptBuilder};
use crate::provider::ModelClient;
use std::time::{Duration, Instant};
use tokio::time::timeout as tokio_timeout;
use tracing::{debug, warn};

use super::{ReviewResult, RunPhase};

/// Review one policy.
///
/// A malformed reply is retried once with a clarifying instruction; a second
/// malformed reply becomes a sentinel result. Transport errors are returned
/// untouched and never retried.
pub async fn review_policy(
    client: &dyn ModelClient,
    prompts: &PromptBuilder,
    prompt: Prompt,
    timeout: Duration,
    index: usize,
    total: usize,
) -> Result<ReviewResult, TransportError> {
    let start = Instant::now();
    let phase = RunPhase::Reviewing { index, total };
    debug!("[{}] sending policy '{}'", phase, prompt.policy_name);

    let (raw, reason) = match call(client, &prompt, timeout).await {
        Ok(response) => return Ok(ReviewResult::from_response(&prompt, response, 1, start)),
        Err(ClientError::Transport(e)) => return Err(e),
        Err(ClientError::Malformed { raw, source }) => (raw, source.to_string()),
    };

    warn!(
        "[{}] unparseable reply for '{}' ({}), retrying once",
        phase, prompt.policy_name, reason
    );
    debug!("Unparseable reply was: {}", raw);

    let retry = prompts.clarify(&prompt, &reason);
    match call(client, &retry, timeout).await {
        Ok(response) => Ok(ReviewResult::from_response(&prompt, response, 2, start)),
        Err(ClientError::Transport(e)) => Err(e),
        Err(ClientError::Malformed { raw, source }) => {
            warn!(
                "[{}] reply for '{}' still unparseable ({}); recording sentinel result",
                RunPhase::PolicyFailed { index, total },
                prompt.policy_name,
                source
            );
            Ok(ReviewResult {
                policy_name: prompt.policy_name.clone(),
                verdict: Verdict::Unparseable,
                comment: raw,
                attempts: 2,
                duration: start.elapsed(),
            })
        }
    }
}

async fn call(
    client: &dyn ModelClient,
    prompt: &Prompt,
    timeout: Duration,
) -> Result<StructuredResponse, ClientError> {
    tokio_timeout(timeout, client.review(prompt))
        .await
        .map_err(|_| ClientError::Transport(TransportError::Timeout(timeout)))?
}

impl ReviewResult {
    fn from_response(
        prompt: &Prompt,
        response: StructuredResponse,
        attempts: u32,
        start: Instant,
    ) -> Self {
        Self {
            policy_name: prompt.policy_name.clone(),
            verdict: response.verdict,
            comment: response.comment,
            attempts,
            duration: start.elapsed(),
        }
    }
}
