use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for recording metadata documents (one JSON file per id)
    pub metadata_path: String,

    /// Directory for audio blobs (one file per id)
    pub uploads_path: String,

    /// Upper bound on a decoded audio payload, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// OpenAI-compatible API base URL, e.g. "https://api.openai.com/v1"
    pub base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    pub model: String,

    /// Transcript character budget before truncation
    #[serde(default = "default_max_transcript_chars")]
    pub max_transcript_chars: usize,

    /// Output length bound passed to the provider
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Provider attempts (including the first call)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds; grows linearly per attempt
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Fixed rate-limit window in seconds
    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    /// Requests allowed per caller per window
    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
}

fn default_max_upload_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_api_key_env() -> String {
    "VOICEJOT_API_KEY".to_string()
}

fn default_max_transcript_chars() -> usize {
    12_000
}

fn default_max_output_tokens() -> u32 {
    512
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_rate_limit_window_secs() -> u64 {
    15 * 60
}

fn default_rate_limit_max() -> u32 {
    100
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VOICEJOT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
