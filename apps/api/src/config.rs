use std::path::PathBuf;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

/// Hard ceiling on a single request body. Uploads above this are rejected
/// before any extraction work starts.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 64;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub llm_timeout: Duration,
    /// Directory temporary upload artifacts are created in.
    pub upload_dir: PathBuf,
    /// Upper bound on requests being handled at the same time, across all routes.
    pub max_concurrent_requests: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            llm_timeout: Duration::from_secs(parse_env(
                "LLM_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            max_concurrent_requests: parse_env(
                "MAX_CONCURRENT_REQUESTS",
                DEFAULT_MAX_CONCURRENT_REQUESTS,
            )?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        };

        ensure!(
            config.max_concurrent_requests > 0,
            "MAX_CONCURRENT_REQUESTS must be at least 1"
        );
        Ok(config)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: no real API key, uploads in `upload_dir`.
    pub fn for_tests(upload_dir: PathBuf) -> Self {
        Config {
            openai_api_key: "test-key".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            llm_timeout: Duration::from_secs(5),
            upload_dir,
            max_concurrent_requests: 4,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
