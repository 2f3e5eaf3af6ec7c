// ABOUTME: Configuration loading and validation for the wringer pipeline.
// ABOUTME: Reads WRINGER_* environment variables; credential errors are fatal at startup.

use thiserror::Error;

const DEFAULT_PROVIDER: &str = "anthropic";
const DEFAULT_SEARCH_URL: &str = "https://searx.be";
const DEFAULT_SEARCH_MAX_RESULTS: usize = 5;

/// Errors that can occur before the pipeline starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("unsupported LLM provider: {0}")]
    UnknownProvider(String),

    #[error("WRINGER_SEARCH_MAX_RESULTS is not a positive number: {0}")]
    InvalidMaxResults(String),
}

/// Pipeline configuration loaded from environment variables.
///
/// API credentials are resolved separately by the provider factory so a
/// missing key for an unused provider never blocks startup.
#[derive(Debug, Clone)]
pub struct WringerConfig {
    pub provider: String,
    pub model: Option<String>,
    pub search_url: String,
    pub search_max_results: usize,
}

impl WringerConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - WRINGER_PROVIDER: LLM provider (default: anthropic)
    /// - WRINGER_MODEL: model identifier (optional; provider default otherwise)
    /// - WRINGER_SEARCH_URL: SearXNG-compatible endpoint (default: https://searx.be)
    /// - WRINGER_SEARCH_MAX_RESULTS: result bound per query (default: 5)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider =
            std::env::var("WRINGER_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.to_string());

        let model = std::env::var("WRINGER_MODEL").ok().filter(|m| !m.is_empty());

        let search_url = std::env::var("WRINGER_SEARCH_URL")
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());

        let search_max_results = match std::env::var("WRINGER_SEARCH_MAX_RESULTS") {
            Ok(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidMaxResults(raw))?,
            Err(_) => DEFAULT_SEARCH_MAX_RESULTS,
        };

        Ok(Self {
            provider,
            model,
            search_url,
            search_max_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all tests that read/write env vars to prevent race conditions.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        // SAFETY: test-only code, serialized by ENV_MUTEX
        unsafe {
            std::env::remove_var("WRINGER_PROVIDER");
            std::env::remove_var("WRINGER_MODEL");
            std::env::remove_var("WRINGER_SEARCH_URL");
            std::env::remove_var("WRINGER_SEARCH_MAX_RESULTS");
        }
    }

    #[test]
    fn config_loads_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = WringerConfig::from_env().unwrap();

        assert_eq!(config.provider, "anthropic");
        assert!(config.model.is_none());
        assert_eq!(config.search_url, "https://searx.be");
        assert_eq!(config.search_max_results, 5);
    }

    #[test]
    fn config_reads_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        // SAFETY: test-only code, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("WRINGER_PROVIDER", "openai");
            std::env::set_var("WRINGER_MODEL", "gpt-4o");
            std::env::set_var("WRINGER_SEARCH_URL", "https://searx.internal");
            std::env::set_var("WRINGER_SEARCH_MAX_RESULTS", "3");
        }

        let result = WringerConfig::from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.search_url, "https://searx.internal");
        assert_eq!(config.search_max_results, 3);
    }

    #[test]
    fn config_rejects_non_numeric_max_results() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        // SAFETY: test-only code, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("WRINGER_SEARCH_MAX_RESULTS", "lots");
        }

        let result = WringerConfig::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("WRINGER_SEARCH_MAX_RESULTS"),
            "error should name the offending variable: {}",
            err
        );
    }

    #[test]
    fn config_rejects_zero_max_results() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        // SAFETY: test-only code, serialized by ENV_MUTEX
        unsafe {
            std::env::set_var("WRINGER_SEARCH_MAX_RESULTS", "0");
        }

        let result = WringerConfig::from_env();
        clear_env();

        assert!(result.is_err(), "zero results per query is not usable");
    }
}
