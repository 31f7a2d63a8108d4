use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// How the upload endpoint reports an extraction-stage failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtractionFailureMode {
    /// 200 response whose `analysis` carries `{error, raw}`. Matches the legacy frontend.
    #[default]
    SuccessPayload,
    /// 422 response with the extraction error as the message.
    ErrorStatus,
}

impl FromStr for ExtractionFailureMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success_payload" => Ok(Self::SuccessPayload),
            "error_status" => Ok(Self::ErrorStatus),
            other => bail!(
                "EXTRACTION_FAILURE_MODE must be 'success_payload' or 'error_status', got '{other}'"
            ),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub llm_model: String,
    /// Transport attempts per model call. 1 means a single attempt with no retry.
    pub llm_max_attempts: u32,
    pub port: u16,
    pub rust_log: String,
    /// Empty means permissive CORS.
    pub cors_allowed_origins: Vec<String>,
    pub extraction_failure_mode: ExtractionFailureMode,
    pub pipeline_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_max_attempts: parse_env::<u32>("LLM_MAX_ATTEMPTS", 1)?.max(1),
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_allowed_origins: parse_origins(
                &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
            ),
            extraction_failure_mode: match std::env::var("EXTRACTION_FAILURE_MODE") {
                Ok(raw) => raw.parse()?,
                Err(_) => ExtractionFailureMode::default(),
            },
            pipeline_timeout: std::env::var("PIPELINE_TIMEOUT_SECS")
                .ok()
                .map(|raw| {
                    raw.parse::<u64>()
                        .context("PIPELINE_TIMEOUT_SECS must be a whole number of seconds")
                })
                .transpose()?
                .map(Duration::from_secs),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
