use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for both analysis and parameter suggestions.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub upstream: UpstreamConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Server-held credential appended as `?key=`. Never returned or logged.
    pub api_key: Secret<String>,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// `*`: any origin may call the relay.
    #[default]
    Any,
    List(Vec<String>),
}

impl RelayConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let api_key = env::var("API_KEY").unwrap_or_default();
        if api_key.trim().is_empty() {
            return Err(AppError::config("API_KEY is required but not set"));
        }

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::config(format!("UPSTREAM_TIMEOUT_SECS is not a number: {}", e))
            })?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(RelayConfig {
            common,
            upstream: UpstreamConfig {
                api_key: Secret::new(api_key),
                base_url: get_env("GEMINI_API_BASE_URL", GEMINI_API_BASE),
                model: get_env("GEMINI_MODEL", DEFAULT_MODEL),
                timeout: Duration::from_secs(timeout_secs),
            },
            cors: CorsConfig::parse(&get_env("CORS_ALLOWED_ORIGINS", "*")),
        })
    }
}

impl UpstreamConfig {
    /// Upstream settings pointing at the public Gemini endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: GEMINI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsConfig::Any
        } else {
            CorsConfig::List(origins)
        }
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
