use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyrevError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    #[error("Review aborted: {0}")]
    Run(#[from] RunError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Unsupported config version {0} (expected {1})")]
    UnsupportedVersion(u32, u32),

    #[error("No policies declared")]
    NoPolicies,

    #[error("Policy '{0}' is declared more than once")]
    DuplicatePolicy(String),

    #[error("Policy #{0} has an empty name")]
    EmptyPolicyName(usize),

    #[error("Invalid verdict scale {min}..={max}")]
    InvalidScale { min: i64, max: i64 },

    #[error("Concurrency must be at least 1")]
    InvalidConcurrency,

    #[error("Environment variable {0} must hold the provider API key")]
    MissingCredential(String),

    #[error("Provider setting '{0}' is required")]
    MissingSetting(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Review root '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Review root '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to build glob pattern '{pattern}': {source}")]
    GlobPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Corpus is {actual} characters, over the limit of {limit}")]
    CorpusTooLarge { actual: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Systemic failures talking to the model. Never retried.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("Authentication rejected ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
}

/// The model replied, but not in the agreed shape.
#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("Response is missing field '{0}'")]
    MissingField(String),

    #[error("Response is missing <{0}> tag")]
    MissingTag(String),

    #[error("Verdict '{0}' is not an integer")]
    InvalidVerdict(String),

    #[error("Verdict {verdict} is outside {min}..={max}")]
    VerdictOutOfRange { verdict: i64, min: i64, max: i64 },

    #[error("Response is empty")]
    Empty,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Malformed model response: {source}")]
    Malformed {
        raw: String,
        #[source]
        source: ParserError,
    },
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("policy '{policy}': {source}")]
    Transport {
        policy: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),

    #[error("Review task for policy '{policy}' failed: {reason}")]
    TaskFailed { policy: String, reason: String },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
