// ABOUTME: Defines the AgentRuntime trait that all LLM provider adapters must implement.
// ABOUTME: Also defines AgentError, the taxonomy of what can go wrong during a turn.

use async_trait::async_trait;

use wringer_core::{ConversationContext, StageSpec};

use crate::search::SearchClient;

/// Errors that can occur during a single agent turn.
///
/// Search-provider failures never appear here; the search client absorbs
/// them and yields empty results inside the turn.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("provider error: {0}")]
    Provider(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("rate limited")]
    RateLimited,

    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

/// Trait that all LLM provider adapters must implement. Each provider
/// (Anthropic, OpenAI) translates a stage instruction plus the accumulated
/// conversation into API calls and returns the generated text.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Execute one agent turn for the given stage.
    ///
    /// When `search` is Some and the stage carries the search capability,
    /// the model may invoke the web-search tool mid-turn; returned snippets
    /// feed that turn's prompt only and are never persisted into the
    /// conversation context. The runtime makes exactly one attempt; retry
    /// policy, if any, belongs to the caller.
    async fn run_turn(
        &self,
        spec: &StageSpec,
        context: &ConversationContext,
        search: Option<&SearchClient>,
    ) -> Result<String, AgentError>;

    /// Provider name for logging and display (e.g. "anthropic", "openai").
    fn provider_name(&self) -> &str;

    /// Model identifier being used (e.g. "claude-sonnet-4-5-20250929").
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_error_display() {
        let errors = vec![
            AgentError::Provider("connection timeout".to_string()),
            AgentError::InvalidResponse("missing content array".to_string()),
            AgentError::RateLimited,
            AgentError::Unauthorized("check ANTHROPIC_API_KEY".to_string()),
        ];

        for err in &errors {
            assert!(!err.to_string().is_empty());
        }

        assert!(
            AgentError::Provider("socket closed".to_string())
                .to_string()
                .contains("socket closed")
        );
        assert_eq!(AgentError::RateLimited.to_string(), "rate limited");
    }
}
