use crate::collector::{truncate_chars, CodeCorpus};
use crate::config::{Config, TruncationPolicy, VerdictScale};
use crate::error::{CollectionError, RunError};
use crate::parser::{ResponseParser, Verdict};
use crate::policy::PolicySet;
use crate::prompt::PromptBuilder;
use crate::provider::ModelClient;
use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{info, warn};

use super::executor::review_policy;
use super::RunPhase;

#[derive(Debug, Clone)]
pub struct ReviewSettings {
    pub target: PathBuf,
    pub concurrency: usize,
    pub timeout: Duration,
    pub launch_delay: Duration,
    pub max_corpus_chars: usize,
    pub truncation: TruncationPolicy,
}

impl ReviewSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            target: config.target.clone(),
            concurrency: config.concurrency.max(1),
            timeout: Duration::from_secs(config.timeout_sec),
            launch_delay: Duration::from_millis(config.launch_delay_ms),
            max_corpus_chars: config.max_corpus_chars,
            truncation: config.truncation,
        }
    }

    /// What the truncation policy does with a corpus of `characters`
    pub fn corpus_fit(&self, characters: usize) -> CorpusFit {
        let limit = self.max_corpus_chars;
        if characters <= limit {
            return CorpusFit::Within { limit };
        }
        match self.truncation {
            TruncationPolicy::Truncate => CorpusFit::Truncate { limit },
            TruncationPolicy::Reject => CorpusFit::Reject { limit },
        }
    }

    /// Directory name shown at the top of the corpus document
    pub fn project_name(&self) -> String {
        let resolved = self
            .target
            .canonicalize()
            .unwrap_or_else(|_| self.target.clone());
        resolved
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| resolved.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusFit {
    Within { limit: usize },
    Truncate { limit: usize },
    Reject { limit: usize },
}

impl std::fmt::Display for CorpusFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorpusFit::Within { limit } => write!(f, "within the {} character limit", limit),
            CorpusFit::Truncate { limit } => write!(f, "will be truncated to {} characters", limit),
            CorpusFit::Reject { limit } => write!(
                f,
                "over the {} character limit; the run will be rejected",
                limit
            ),
        }
    }
}

/// One policy's outcome; never mutated after creation
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub policy_name: String,
    pub verdict: Verdict,
    pub comment: String,
    /// Model calls spent, including the clarifying retry
    pub attempts: u32,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusStats {
    pub files: usize,
    pub characters: usize,
    pub sent_characters: usize,
    pub truncated: bool,
    pub fingerprint: String,
}

/// Corpus document shared by every prompt in a run
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    pub text: Arc<str>,
    pub stats: CorpusStats,
}

/// Results in policy declaration order, plus run metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewReport {
    pub results: Vec<ReviewResult>,
    pub target: PathBuf,
    pub provider: String,
    pub scale: VerdictScale,
    pub corpus: CorpusStats,
    pub generated_at: DateTime<Utc>,
    pub total_duration: Duration,
}

impl ReviewReport {
    pub fn sentinel_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.verdict.is_sentinel())
            .count()
    }

    /// Mean of scored verdicts, ignoring N/A and sentinels
    pub fn average_score(&self) -> Option<f64> {
        let scores: Vec<i64> = self.results.iter().filter_map(|r| r.verdict.score()).collect();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<i64>() as f64 / scores.len() as f64)
        }
    }
}

pub struct Orchestrator {
    client: Arc<dyn ModelClient>,
    prompts: Arc<PromptBuilder>,
    scale: VerdictScale,
    settings: ReviewSettings,
    semaphore: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(
        client: Arc<dyn ModelClient>,
        parser: &ResponseParser,
        settings: ReviewSettings,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(settings.concurrency.max(1)));
        Self {
            client,
            prompts: Arc::new(PromptBuilder::new(parser)),
            scale: parser.scale(),
            settings,
            semaphore,
        }
    }

    /// Render the corpus once and apply the truncation policy
    pub fn prepare_corpus(&self, corpus: &CodeCorpus) -> Result<PreparedCorpus, CollectionError> {
        let rendered = corpus.render(&self.settings.project_name());
        let characters = rendered.chars().count();

        let text = match self.settings.corpus_fit(characters) {
            CorpusFit::Within { .. } => rendered,
            CorpusFit::Reject { limit } => {
                return Err(CollectionError::CorpusTooLarge {
                    actual: characters,
                    limit,
                })
            }
            CorpusFit::Truncate { limit } => {
                warn!(
                    "Corpus is {} characters; truncating to {} before review",
                    characters, limit
                );
                truncate_chars(&rendered, limit).to_string()
            }
        };

        Ok(PreparedCorpus {
            stats: CorpusStats {
                files: corpus.len(),
                characters,
                sent_characters: text.chars().count(),
                truncated: characters > self.settings.max_corpus_chars,
                fingerprint: corpus.fingerprint(),
            },
            text: Arc::from(text),
        })
    }

    /// Review every policy against the corpus.
    ///
    /// Either every policy gets a result, in declaration order, or the run
    /// aborts on the first transport failure and no report is produced.
    pub async fn review(
        &self,
        corpus: &CodeCorpus,
        policies: &PolicySet,
    ) -> Result<ReviewReport, RunError> {
        let start = Instant::now();
        let prepared = self.prepare_corpus(corpus)?;
        let total = policies.len();

        info!(
            "Reviewing {} policies with {} (concurrency {})",
            total,
            self.client.name(),
            self.settings.concurrency
        );

        let aborted = Arc::new(AtomicBool::new(false));
        let mut futures = FuturesUnordered::new();
        let mut abort_handles = Vec::with_capacity(total);

        for (idx, policy) in policies.iter().enumerate() {
            // Small delay between launches to avoid burst rate limits
            if idx > 0 && self.settings.launch_delay > Duration::ZERO {
                sleep(self.settings.launch_delay).await;
            }

            let permit = self.semaphore.clone().acquire_owned().await?;
            if aborted.load(Ordering::SeqCst) {
                break;
            }

            let client = self.client.clone();
            let prompts = self.prompts.clone();
            let prompt = self.prompts.build(policy, prepared.text.clone());
            let timeout = self.settings.timeout;
            let aborted = aborted.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit; // hold until done
                let result =
                    review_policy(client.as_ref(), &prompts, prompt, timeout, idx, total).await;
                if result.is_err() {
                    aborted.store(true, Ordering::SeqCst);
                }
                result
            });
            abort_handles.push(handle.abort_handle());
            futures.push(async move { (idx, handle.await) });
        }

        // Barrier: wait for every dispatched review before building the report
        let mut slots: Vec<Option<ReviewResult>> = vec![None; total];
        while let Some((idx, joined)) = futures.next().await {
            let policy = &policies.as_slice()[idx].name;
            let error = match joined {
                Ok(Ok(result)) => {
                    info!(
                        "Completed '{}': verdict {} after {} attempt(s)",
                        result.policy_name, result.verdict, result.attempts
                    );
                    slots[idx] = Some(result);
                    continue;
                }
                Ok(Err(source)) => RunError::Transport {
                    policy: policy.clone(),
                    source,
                },
                Err(e) => RunError::TaskFailed {
                    policy: policy.clone(),
                    reason: e.to_string(),
                },
            };

            warn!("[{}] {}", RunPhase::Aborted, error);
            for handle in &abort_handles {
                handle.abort();
            }
            return Err(error);
        }

        let results = slots
            .into_iter()
            .zip(policies.iter())
            .map(|(slot, policy)| {
                slot.ok_or_else(|| RunError::TaskFailed {
                    policy: policy.name.clone(),
                    reason: "no result recorded".to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReviewReport {
            results,
            target: self.settings.target.clone(),
            provider: self.client.name().to_string(),
            scale: self.scale,
            corpus: prepared.stats,
            generated_at: Utc::now(),
            total_duration: start.elapsed(),
        })
    }
}
