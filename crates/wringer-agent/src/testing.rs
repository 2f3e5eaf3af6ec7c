// ABOUTME: Test utilities for wringer-agent, including stub agent runtimes.
// ABOUTME: Used in tests to simulate LLM turns without real API calls.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use wringer_core::{ConversationContext, StageSpec};

use crate::runtime::{AgentError, AgentRuntime};
use crate::search::SearchClient;

/// A stub runtime that replays a fixed sequence of turn results.
///
/// Each call pops the next scripted reply; an `Err(reason)` entry surfaces
/// as `AgentError::Provider(reason)`. When the script runs out, the stub
/// answers with a generic per-stage text so open-ended tests keep working.
/// Call counts and observed context lengths are recorded for assertions.
pub struct StubAgentRuntime {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
    contexts: Mutex<Vec<usize>>,
}

impl StubAgentRuntime {
    /// Create a stub that replays the given results in order.
    pub fn with_replies(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Create a stub where every scripted turn succeeds with the given text.
    pub fn succeeding(texts: &[&str]) -> Self {
        Self::with_replies(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    /// Number of turns this stub has executed.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Context length observed at the start of each turn, in call order.
    pub fn contexts_seen(&self) -> Vec<usize> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentRuntime for StubAgentRuntime {
    async fn run_turn(
        &self,
        spec: &StageSpec,
        context: &ConversationContext,
        _search: Option<&SearchClient>,
    ) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(context.len());

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(reason)) => Err(AgentError::Provider(reason)),
            None => Ok(format!("stub output for {}", spec.name.label())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

/// A stub runtime that exercises the search client the way a real adapter
/// would: when the orchestrator offers search, it runs one query and folds
/// the hit count into its answer. Useful for verifying that search outages
/// degrade to best-effort text instead of failing the stage.
pub struct SearchProbeRuntime {
    offered: Mutex<Vec<bool>>,
}

impl SearchProbeRuntime {
    pub fn new() -> Self {
        Self {
            offered: Mutex::new(Vec::new()),
        }
    }

    /// Whether search was offered on each turn, in call order.
    pub fn search_offered(&self) -> Vec<bool> {
        self.offered.lock().unwrap().clone()
    }
}

impl Default for SearchProbeRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentRuntime for SearchProbeRuntime {
    async fn run_turn(
        &self,
        spec: &StageSpec,
        _context: &ConversationContext,
        search: Option<&SearchClient>,
    ) -> Result<String, AgentError> {
        self.offered.lock().unwrap().push(search.is_some());

        match search {
            Some(client) => {
                let results = client
                    .search(&format!("data for {}", spec.name.label()), client.max_results())
                    .await;
                Ok(format!(
                    "{} analysis drawing on {} sources",
                    spec.name.label(),
                    results.len()
                ))
            }
            None => Ok(format!("{} analysis from prior context", spec.name.label())),
        }
    }

    fn provider_name(&self) -> &str {
        "search-probe"
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wringer_core::pipeline_stages;

    #[tokio::test]
    async fn stub_replays_scripted_replies_in_order() {
        let stub = StubAgentRuntime::with_replies(vec![
            Ok("first".to_string()),
            Err("boom".to_string()),
        ]);
        let stages = pipeline_stages();
        let ctx = ConversationContext::new("idea".to_string());

        let first = stub.run_turn(&stages[0], &ctx, None).await;
        assert_eq!(first.unwrap(), "first");

        let second = stub.run_turn(&stages[1], &ctx, None).await;
        let err = second.unwrap_err();
        assert!(err.to_string().contains("boom"));

        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn stub_falls_back_to_generic_text_when_script_runs_out() {
        let stub = StubAgentRuntime::with_replies(Vec::new());
        let stages = pipeline_stages();
        let ctx = ConversationContext::new("idea".to_string());

        let text = stub.run_turn(&stages[3], &ctx, None).await.unwrap();
        assert!(text.contains("swot_analyst"));
    }

    #[tokio::test]
    async fn probe_reports_search_availability() {
        let probe = SearchProbeRuntime::new();
        let stages = pipeline_stages();
        let ctx = ConversationContext::new("idea".to_string());

        let text = probe.run_turn(&stages[0], &ctx, None).await.unwrap();
        assert!(text.contains("from prior context"));
        assert_eq!(probe.search_offered(), vec![false]);
    }
}
