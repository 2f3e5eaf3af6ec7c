// ABOUTME: Factory function resolving a provider name into a configured AgentRuntime.
// ABOUTME: Reads API keys from the environment; a missing key is a startup-time ConfigError.

use std::env;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::providers::{anthropic, openai};
use crate::runtime::AgentRuntime;

/// Create an agent runtime for the given provider name.
///
/// The model is resolved from:
/// 1. The explicit `model` parameter (if Some)
/// 2. A provider-specific environment variable (e.g. ANTHROPIC_MODEL)
/// 3. A sensible default for that provider
///
/// Base URLs honor ANTHROPIC_BASE_URL / OPENAI_BASE_URL for proxy setups.
pub fn create_runtime(
    provider: &str,
    model: Option<&str>,
) -> Result<Arc<dyn AgentRuntime>, ConfigError> {
    match provider {
        "anthropic" => {
            let api_key = env::var("ANTHROPIC_API_KEY")
                .map_err(|_| ConfigError::MissingApiKey("ANTHROPIC_API_KEY"))?;
            let base_url = env::var("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|_| anthropic::DEFAULT_BASE_URL.to_string());
            let resolved_model = model
                .map(String::from)
                .or_else(|| env::var("ANTHROPIC_MODEL").ok())
                .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string());
            Ok(Arc::new(anthropic::AnthropicRuntime::new(
                api_key,
                base_url,
                resolved_model,
            )))
        }
        "openai" => {
            let api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| ConfigError::MissingApiKey("OPENAI_API_KEY"))?;
            let base_url = env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| openai::DEFAULT_BASE_URL.to_string());
            let resolved_model = model
                .map(String::from)
                .or_else(|| env::var("OPENAI_MODEL").ok())
                .unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            Ok(Arc::new(openai::OpenAIRuntime::new(
                api_key,
                base_url,
                resolved_model,
            )))
        }
        unknown => Err(ConfigError::UnknownProvider(unknown.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serialize all tests that read/write env vars to prevent race conditions.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to extract the error string from a create_runtime result.
    /// Uses match instead of unwrap_err() because Arc<dyn AgentRuntime>
    /// doesn't impl Debug.
    fn expect_err(result: Result<Arc<dyn AgentRuntime>, ConfigError>) -> String {
        match result {
            Err(e) => e.to_string(),
            Ok(runtime) => panic!("expected error, got Ok with model: {}", runtime.model_name()),
        }
    }

    #[test]
    fn unknown_provider_returns_error() {
        let err = expect_err(create_runtime("unknown", None));
        assert!(
            err.contains("unsupported LLM provider"),
            "expected 'unsupported LLM provider' in error, got: {}",
            err
        );
    }

    #[test]
    fn anthropic_missing_api_key_returns_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var("ANTHROPIC_API_KEY") };
        let err = expect_err(create_runtime("anthropic", None));
        assert!(
            err.contains("ANTHROPIC_API_KEY"),
            "expected mention of ANTHROPIC_API_KEY in error, got: {}",
            err
        );
    }

    #[test]
    fn openai_missing_api_key_returns_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var("OPENAI_API_KEY") };
        let err = expect_err(create_runtime("openai", None));
        assert!(
            err.contains("OPENAI_API_KEY"),
            "expected mention of OPENAI_API_KEY in error, got: {}",
            err
        );
    }

    #[test]
    fn explicit_model_param_overrides_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var("ANTHROPIC_API_KEY", "test-key-456");
            env::remove_var("ANTHROPIC_MODEL");
        }

        let result = create_runtime("anthropic", Some("claude-opus-4-20250514"));

        unsafe { env::remove_var("ANTHROPIC_API_KEY") };

        let runtime = match result {
            Ok(r) => r,
            Err(e) => panic!("expected Ok, got Err: {}", e),
        };
        assert_eq!(
            runtime.model_name(),
            "claude-opus-4-20250514",
            "explicit model param should override default"
        );
    }

    #[test]
    fn anthropic_success_returns_default_model() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe {
            env::set_var("ANTHROPIC_API_KEY", "test-key-123");
            env::remove_var("ANTHROPIC_MODEL");
        }

        let result = create_runtime("anthropic", None);

        unsafe { env::remove_var("ANTHROPIC_API_KEY") };

        let runtime = match result {
            Ok(r) => r,
            Err(e) => panic!("expected Ok, got Err: {}", e),
        };
        assert_eq!(runtime.provider_name(), "anthropic");
        assert_eq!(runtime.model_name(), anthropic::DEFAULT_MODEL);
    }
}
