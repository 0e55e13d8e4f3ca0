pub mod error;
pub mod gemini;
pub mod provider;

pub use error::{LlmError, LlmResult};
pub use gemini::GeminiClient;
pub use provider::LlmProvider;

use std::time::Duration;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Configuration for the generative model
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
}

impl LlmConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Read `GEMINI_API_KEY` (required) plus the optional `GEMINI_MODEL`,
    /// `GEMINI_BASE_URL`, `LLM_TIMEOUT_SECS`, `GEMINI_TEMPERATURE` and
    /// `GEMINI_MAX_OUTPUT_TOKENS` overrides.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = env_parse::<u64>("LLM_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        config.temperature = env_parse("GEMINI_TEMPERATURE")?;
        config.max_output_tokens = env_parse("GEMINI_MAX_OUTPUT_TOKENS")?;

        Ok(config)
    }
}

/// Parse an optional env var; unset is `None`, unparseable is `InvalidConfig`.
fn env_parse<T: std::str::FromStr>(name: &str) -> LlmResult<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => parse_setting(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_setting<T: std::str::FromStr>(name: &str, raw: &str) -> LlmResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| LlmError::InvalidConfig(format!("{}='{}'", name, raw)))
}

// Keeps the key out of logs.
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"***")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}
