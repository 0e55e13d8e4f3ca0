use anyhow::{Context, Result};
use axum::http::HeaderValue;
use career_core::DEFAULT_DATA_API_URL;
use llm_client::LlmConfig;
use std::env;
use std::time::Duration;

/// Router-level HTTP behaviour
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// `None` allows any origin
    pub cors_allowed_origins: Option<Vec<HeaderValue>>,
    pub enable_hsts: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub llm: LlmConfig,
    pub financial_data_timeout: Duration,
    pub default_data_api_url: String,
    pub http: HttpOptions,
}

impl ServerConfig {
    /// Load configuration from the environment. Fails when `GEMINI_API_KEY`
    /// is missing.
    pub fn from_env() -> Result<Self> {
        let llm = LlmConfig::from_env().context("Failed to load model configuration")?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let financial_data_timeout_secs: u64 = env::var("FINANCIAL_DATA_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .context("FINANCIAL_DATA_TIMEOUT_SECS must be a whole number of seconds")?;

        let cors_allowed_origins = parse_cors_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        )?;

        let enable_hsts = env::var("ENABLE_HSTS")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            llm,
            financial_data_timeout: Duration::from_secs(financial_data_timeout_secs),
            default_data_api_url: env::var("DEFAULT_DATA_API_URL")
                .unwrap_or_else(|_| DEFAULT_DATA_API_URL.to_string()),
            http: HttpOptions {
                cors_allowed_origins,
                enable_hsts,
            },
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `*` (or empty) allows any origin; otherwise a comma-separated list.
fn parse_cors_origins(raw: &str) -> Result<Option<Vec<HeaderValue>>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "*" {
        return Ok(None);
    }

    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{}'", o))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
