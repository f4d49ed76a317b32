use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use mediaforge_core::cache::DEFAULT_CACHE_TTL;
use mediaforge_core::metrics::DEFAULT_MAX_SERIES_LEN;
use mediaforge_core::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
use mediaforge_providers::{aiml, bfl, completion, kling, replicate};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to stop after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub pipeline: PipelineConfig,
    pub providers: ProviderConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_or("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", 120);
        let shutdown_timeout_secs: u64 = env_or("SHUTDOWN_TIMEOUT_SECS", 30);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            pipeline: PipelineConfig::from_env(),
            providers: ProviderConfig::from_env(),
        }
    }
}

/// Prompt pipeline, cache, metrics and rate limiting settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Completion model used by every stage.
    pub completion_model: String,
    pub cache_ttl_secs: u64,
    /// How often expired cache entries are swept.
    pub cache_cleanup_interval_secs: u64,
    /// Records retained per metrics series.
    pub metrics_max_series_len: usize,
    pub rate_limit: RateLimitConfig,
}

impl PipelineConfig {
    /// | Env Var                       | Default        |
    /// |-------------------------------|----------------|
    /// | `COMPLETION_MODEL`            | `gpt-4o-mini`  |
    /// | `PROMPT_CACHE_TTL_SECS`       | `300`          |
    /// | `CACHE_CLEANUP_INTERVAL_SECS` | `60`           |
    /// | `METRICS_MAX_SERIES_LEN`      | `1000`         |
    pub fn from_env() -> Self {
        Self {
            completion_model: std::env::var("COMPLETION_MODEL")
                .unwrap_or_else(|_| completion::DEFAULT_MODEL.into()),
            cache_ttl_secs: env_or("PROMPT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL.as_secs()),
            cache_cleanup_interval_secs: env_or("CACHE_CLEANUP_INTERVAL_SECS", 60),
            metrics_max_series_len: env_or("METRICS_MAX_SERIES_LEN", DEFAULT_MAX_SERIES_LEN),
            rate_limit: RateLimitConfig::from_env(),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cache_cleanup_interval_secs.max(1))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            completion_model: completion::DEFAULT_MODEL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            cache_cleanup_interval_secs: 60,
            metrics_max_series_len: DEFAULT_MAX_SERIES_LEN,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Per-client limits on the prompt endpoints. Off unless enabled.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Key clients by `x-forwarded-for` / `x-real-ip` instead of the peer
    /// address. Only safe behind a proxy that sets those headers.
    pub trust_proxy: bool,
    pub max_requests: usize,
    pub window_ms: u64,
}

impl RateLimitConfig {
    /// | Env Var                   | Default |
    /// |---------------------------|---------|
    /// | `RATE_LIMIT_ENABLED`      | `false` |
    /// | `RATE_LIMIT_TRUST_PROXY`  | `false` |
    /// | `RATE_LIMIT_MAX_REQUESTS` | `10`    |
    /// | `RATE_LIMIT_WINDOW_MS`    | `60000` |
    pub fn from_env() -> Self {
        Self {
            enabled: env_or("RATE_LIMIT_ENABLED", false),
            trust_proxy: env_or("RATE_LIMIT_TRUST_PROXY", false),
            max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", DEFAULT_MAX_REQUESTS),
            window_ms: env_or("RATE_LIMIT_WINDOW_MS", DEFAULT_WINDOW.as_millis() as u64),
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trust_proxy: false,
            max_requests: DEFAULT_MAX_REQUESTS,
            window_ms: DEFAULT_WINDOW.as_millis() as u64,
        }
    }
}

/// Credentials and endpoints for external APIs.
///
/// Keys are optional at startup; a call to a provider without a key fails
/// with a configuration error.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    /// Timeout for each outbound provider call (default: `60`).
    pub completion_timeout_secs: u64,
    pub bfl_api_key: Option<String>,
    pub bfl_base_url: String,
    pub kling_access_key: Option<String>,
    pub kling_secret_key: Option<String>,
    pub kling_base_url: String,
    pub aiml_api_key: Option<String>,
    pub aiml_base_url: String,
    pub replicate_api_token: Option<String>,
    pub replicate_base_url: String,
}

impl ProviderConfig {
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `OPENAI_API_KEY`          | unset                        |
    /// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1`  |
    /// | `COMPLETION_TIMEOUT_SECS` | `60`                         |
    /// | `BFL_API_KEY`             | unset                        |
    /// | `BFL_BASE_URL`            | `https://api.bfl.ml`         |
    /// | `KLING_ACCESS_KEY`        | unset                        |
    /// | `KLING_SECRET_KEY`        | unset                        |
    /// | `KLING_BASE_URL`          | `https://api.klingai.com`    |
    /// | `AIML_API_KEY`            | unset                        |
    /// | `AIML_BASE_URL`           | `https://api.aimlapi.com`    |
    /// | `REPLICATE_API_TOKEN`     | unset                        |
    /// | `REPLICATE_BASE_URL`      | `https://api.replicate.com`  |
    pub fn from_env() -> Self {
        Self {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| completion::DEFAULT_BASE_URL.into()),
            completion_timeout_secs: env_or("COMPLETION_TIMEOUT_SECS", 60),
            bfl_api_key: optional_env("BFL_API_KEY"),
            bfl_base_url: std::env::var("BFL_BASE_URL")
                .unwrap_or_else(|_| bfl::DEFAULT_BASE_URL.into()),
            kling_access_key: optional_env("KLING_ACCESS_KEY"),
            kling_secret_key: optional_env("KLING_SECRET_KEY"),
            kling_base_url: std::env::var("KLING_BASE_URL")
                .unwrap_or_else(|_| kling::DEFAULT_BASE_URL.into()),
            aiml_api_key: optional_env("AIML_API_KEY"),
            aiml_base_url: std::env::var("AIML_BASE_URL")
                .unwrap_or_else(|_| aiml::DEFAULT_BASE_URL.into()),
            replicate_api_token: optional_env("REPLICATE_API_TOKEN"),
            replicate_base_url: std::env::var("REPLICATE_BASE_URL")
                .unwrap_or_else(|_| replicate::DEFAULT_BASE_URL.into()),
        }
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: completion::DEFAULT_BASE_URL.to_string(),
            completion_timeout_secs: 60,
            bfl_api_key: None,
            bfl_base_url: bfl::DEFAULT_BASE_URL.to_string(),
            kling_access_key: None,
            kling_secret_key: None,
            kling_base_url: kling::DEFAULT_BASE_URL.to_string(),
            aiml_api_key: None,
            aiml_base_url: aiml::DEFAULT_BASE_URL.to_string(),
            replicate_api_token: None,
            replicate_base_url: replicate::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
///
/// Panics on an unparsable value so misconfiguration fails at startup.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Read `name`, treating an empty value as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
