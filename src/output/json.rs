use crate::error::OutputError;
use crate::runner::ReviewReport;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Flat, serializable view of a [`ReviewReport`]
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub target: String,
    pub provider: String,
    pub scale: JsonScale,
    pub corpus: JsonCorpus,
    pub duration_sec: f64,
    pub average_score: Option<f64>,
    pub unparseable: usize,
    pub results: Vec<JsonResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonScale {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonCorpus {
    pub files: usize,
    pub characters: usize,
    pub sent_characters: usize,
    pub truncated: bool,
    pub fingerprint: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResult {
    pub policy: String,
    /// `scored`, `not_applicable` or `unparseable`
    pub status: String,
    pub verdict: Option<i64>,
    pub comment: String,
    pub attempts: u32,
    pub duration_sec: f64,
}

impl From<&ReviewReport> for JsonReport {
    fn from(report: &ReviewReport) -> Self {
        Self {
            generated_at: report
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            target: report.target.display().to_string(),
            provider: report.provider.clone(),
            scale: JsonScale {
                min: report.scale.min,
                max: report.scale.max,
            },
            corpus: JsonCorpus {
                files: report.corpus.files,
                characters: report.corpus.characters,
                sent_characters: report.corpus.sent_characters,
                truncated: report.corpus.truncated,
                fingerprint: report.corpus.fingerprint.clone(),
            },
            duration_sec: report.total_duration.as_secs_f64(),
            average_score: report.average_score(),
            unparseable: report.sentinel_count(),
            results: report
                .results
                .iter()
                .map(|r| JsonResult {
                    policy: r.policy_name.clone(),
                    status: r.verdict.status().to_string(),
                    verdict: r.verdict.score(),
                    comment: r.comment.clone(),
                    attempts: r.attempts,
                    duration_sec: r.duration.as_secs_f64(),
                })
                .collect(),
        }
    }
}

pub fn render_json(report: &ReviewReport) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(&JsonReport::from(report))?;
    json.push('\n');
    Ok(json)
}
