//! Environment-driven configuration.
//!
//! Every setting has a default except the provider API keys. Blank values are
//! treated as unset so that an `.env` line like `TIINGO_API_KEY=` disables the
//! provider instead of sending an empty token.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::retry::RetryPolicy;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 7171;

/// Origins allowed when `CORS_ORIGINS` is not set: the local frontend dev servers.
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "https://localhost:4201",
    "https://127.0.0.1:4201",
    "https://localhost:4001",
    "https://127.0.0.1:4001",
    "https://localhost",
    "https://127.0.0.1",
];

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("APP_PORT must be a port number, got '{0}'")]
    InvalidPort(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub tiingo_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub quote: QuoteConfig,
    pub insight: InsightConfig,
}

/// Settings for the latest-quote fallback chain.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Zero disables the quote cache.
    pub cache_ttl: Duration,
    /// Target staleness of the Yahoo intraday fallback price.
    pub delay: Duration,
    pub alpha_vantage_per_minute: u64,
    pub retry: RetryPolicy,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60),
            delay: Duration::from_secs(15 * 60),
            alpha_vantage_per_minute: 5,
            retry: RetryPolicy::default(),
        }
    }
}

/// Settings for the fin-insight subprocess.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Explicit path to `fin_insight.py`; discovered when `None`.
    pub script: Option<PathBuf>,
    pub python: String,
    pub timeout: Duration,
    pub max_concurrency: usize,
    /// Zero disables the insight cache.
    pub cache_ttl: Duration,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            script: None,
            python: "python3".to_string(),
            timeout: Duration::from_secs(120),
            max_concurrency: 2,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("APP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let cors_origins = match get("CORS_ORIGINS") {
            Some(raw) => parse_origins(&raw),
            None => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        let retry_defaults = RetryPolicy::default();
        let quote_defaults = QuoteConfig::default();
        let quote = QuoteConfig {
            cache_ttl: Duration::from_secs(parse_or(
                &get,
                "QUOTE_CACHE_TTL_SECS",
                quote_defaults.cache_ttl.as_secs(),
            )),
            delay: Duration::from_secs(
                parse_or(&get, "QUOTE_DELAY_MINUTES", quote_defaults.delay.as_secs() / 60) * 60,
            ),
            alpha_vantage_per_minute: parse_or(
                &get,
                "ALPHA_VANTAGE_REQUESTS_PER_MINUTE",
                quote_defaults.alpha_vantage_per_minute,
            ),
            retry: RetryPolicy {
                max_retries: parse_or(&get, "UPSTREAM_RETRY_MAX", retry_defaults.max_retries),
                base_delay_ms: parse_or(&get, "UPSTREAM_RETRY_BASE_MS", retry_defaults.base_delay_ms),
                max_delay_ms: parse_or(&get, "UPSTREAM_RETRY_MAX_MS", retry_defaults.max_delay_ms),
            },
        };

        let insight_defaults = InsightConfig::default();
        let insight = InsightConfig {
            script: get("FIN_INSIGHT_SCRIPT").map(PathBuf::from),
            python: get("FIN_INSIGHT_PYTHON").unwrap_or(insight_defaults.python),
            timeout: Duration::from_secs(parse_or(
                &get,
                "FIN_INSIGHT_TIMEOUT_SECS",
                insight_defaults.timeout.as_secs(),
            )),
            max_concurrency: parse_or(
                &get,
                "FIN_INSIGHT_MAX_CONCURRENCY",
                insight_defaults.max_concurrency,
            )
            .max(1),
            cache_ttl: Duration::from_secs(parse_or(
                &get,
                "INSIGHT_CACHE_TTL_SECS",
                insight_defaults.cache_ttl.as_secs(),
            )),
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            cors_origins,
            tiingo_api_key: get("TIINGO_API_KEY"),
            alpha_vantage_api_key: get("ALPHA_VANTAGE_API_KEY"),
            quote,
            insight,
        })
    }
}

/// Splits a comma-separated origin list, trimming entries and dropping empty ones.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!("Ignoring invalid {}='{}', using {}", key, raw, default);
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_empty() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 7171);
        assert_eq!(cfg.cors_origins.len(), DEFAULT_CORS_ORIGINS.len());
        assert!(cfg.tiingo_api_key.is_none());
        assert!(cfg.alpha_vantage_api_key.is_none());
        assert_eq!(cfg.quote.cache_ttl, Duration::from_secs(60));
        assert_eq!(cfg.quote.delay, Duration::from_secs(900));
        assert_eq!(cfg.insight.python, "python3");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let cfg = config_from(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8080"),
            ("CORS_ORIGINS", "https://a.example, https://b.example/ ,,"),
            ("TIINGO_API_KEY", "tiingo"),
            ("ALPHA_VANTAGE_API_KEY", "av"),
            ("QUOTE_DELAY_MINUTES", "5"),
            ("FIN_INSIGHT_SCRIPT", "/opt/fin_insight.py"),
        ])
        .unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(cfg.tiingo_api_key.as_deref(), Some("tiingo"));
        assert_eq!(cfg.alpha_vantage_api_key.as_deref(), Some("av"));
        assert_eq!(cfg.quote.delay, Duration::from_secs(300));
        assert_eq!(cfg.insight.script, Some(PathBuf::from("/opt/fin_insight.py")));
    }

    #[test]
    fn blank_values_are_unset() {
        let cfg = config_from(&[("TIINGO_API_KEY", "   "), ("APP_HOST", "")]).unwrap();
        assert!(cfg.tiingo_api_key.is_none());
        assert_eq!(cfg.host, DEFAULT_HOST);
    }

    #[test]
    fn invalid_port_is_an_error() {
        let err = config_from(&[("APP_PORT", "seventy")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPort("seventy".to_string()));
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let cfg = config_from(&[
            ("QUOTE_CACHE_TTL_SECS", "soon"),
            ("FIN_INSIGHT_MAX_CONCURRENCY", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.quote.cache_ttl, Duration::from_secs(60));
        assert_eq!(cfg.insight.max_concurrency, 1);
    }
}
