use std::path::PathBuf;

pub fn default_version() -> u32 {
    super::CONFIG_VERSION
}

pub fn default_target() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_concurrency() -> usize {
    4
}

pub fn default_timeout_sec() -> u64 {
    120
}

pub fn default_launch_delay_ms() -> u64 {
    200
}

pub fn default_max_corpus_chars() -> usize {
    400_000
}

pub fn default_scale_min() -> i64 {
    0
}

pub fn default_scale_max() -> i64 {
    5
}

pub fn default_verdict_key() -> String {
    "verdict".to_string()
}

pub fn default_comment_key() -> String {
    "comment".to_string()
}

pub fn default_exclude() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/__pycache__/**".to_string(),
        "**/*.lock".to_string(),
    ]
}

pub fn default_max_file_bytes() -> u64 {
    512 * 1024
}

pub fn default_openai_base_url() -> String {
    "https://api.openai.com".to_string()
}

pub fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

pub fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub fn default_azure_deployment() -> String {
    "gpt-4o".to_string()
}

pub fn default_azure_api_version() -> String {
    "2024-10-21".to_string()
}

pub fn default_azure_key_env() -> String {
    "AZURE_OPENAI_API_KEY".to_string()
}

pub fn default_temperature() -> f32 {
    0.1
}

pub fn default_claude_binary() -> PathBuf {
    // Check common install location first
    if let Some(home) = std::env::var_os("HOME") {
        let local_path = PathBuf::from(home).join(".claude/local/claude");
        if local_path.exists() {
            return local_path;
        }
    }
    // Fall back to PATH lookup
    PathBuf::from("claude")
}
