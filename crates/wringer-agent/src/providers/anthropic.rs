// ABOUTME: Anthropic Claude API adapter implementing the AgentRuntime trait.
// ABOUTME: Runs one stage turn against the Messages API, mediating optional web_search tool calls.

use async_trait::async_trait;
use serde_json::{Value, json};

use wringer_core::{ConversationContext, StageSpec};

use crate::providers::{
    MAX_TOOL_ROUNDS, SEARCH_TOOL_DESCRIPTION, SEARCH_TOOL_NAME, TurnReply, format_search_results,
    search_tool_schema, turn_request,
};
use crate::runtime::{AgentError, AgentRuntime};
use crate::search::SearchClient;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// Anthropic Claude runtime adapter. Calls the Messages API once per stage
/// turn, looping through bounded web_search tool rounds when the stage
/// carries the search capability.
pub struct AnthropicRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicRuntime {
    /// Create a new AnthropicRuntime with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the Anthropic Messages API.
    ///
    /// The web_search tool is advertised only while `tool_active`; once the
    /// round budget is spent, `allow_tool_call` flips tool_choice to "none"
    /// so the model must produce its final text.
    pub fn build_request_body(
        &self,
        spec: &StageSpec,
        messages: &[Value],
        tool_active: bool,
        allow_tool_call: bool,
    ) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": spec.instruction,
            "messages": messages,
        });

        if tool_active {
            body["tools"] = json!([{
                "name": SEARCH_TOOL_NAME,
                "description": SEARCH_TOOL_DESCRIPTION,
                "input_schema": search_tool_schema(),
            }]);
            body["tool_choice"] = if allow_tool_call {
                json!({"type": "auto"})
            } else {
                json!({"type": "none"})
            };
        }

        body
    }

    /// Parse an Anthropic Messages API response into a TurnReply.
    pub(crate) fn parse_response(response_body: &Value) -> Result<TurnReply, AgentError> {
        let content = response_body
            .get("content")
            .and_then(|c| c.as_array())
            .ok_or_else(|| {
                AgentError::InvalidResponse("missing content array in response".to_string())
            })?;

        // tool_use blocks take priority over any interleaved text
        for block in content {
            if block.get("type").and_then(|t| t.as_str()) == Some("tool_use") {
                return parse_tool_use(block);
            }
        }

        let text: String = content
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
            .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(AgentError::InvalidResponse(
                "no text content in response".to_string(),
            ));
        }

        Ok(TurnReply::Text(text))
    }

    /// POST the request body and map HTTP-level failures onto AgentError.
    async fn post(&self, body: &Value) -> Result<Value, AgentError> {
        let url = format!("{}/v1/messages", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::Provider(format!("HTTP request failed: {}", e)))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AgentError::RateLimited);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AgentError::Unauthorized(
                "check ANTHROPIC_API_KEY".to_string(),
            ));
        }

        if status.is_server_error() {
            return Err(AgentError::Provider(format!("server error: {}", status)));
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(AgentError::Provider(format!(
                "API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(format!("failed to parse JSON: {}", e)))
    }
}

/// Parse a web_search tool_use block into a TurnReply::SearchCall.
fn parse_tool_use(block: &Value) -> Result<TurnReply, AgentError> {
    let tool_name = block
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| AgentError::InvalidResponse("tool_use block missing name".to_string()))?;

    if tool_name != SEARCH_TOOL_NAME {
        return Err(AgentError::InvalidResponse(format!(
            "unknown tool: {}",
            tool_name
        )));
    }

    let id = block
        .get("id")
        .and_then(|i| i.as_str())
        .ok_or_else(|| AgentError::InvalidResponse("tool_use block missing id".to_string()))?
        .to_string();

    let query = block
        .get("input")
        .and_then(|i| i.get("query"))
        .and_then(|q| q.as_str())
        .ok_or_else(|| {
            AgentError::InvalidResponse("web_search call missing query".to_string())
        })?
        .to_string();

    Ok(TurnReply::SearchCall { id, query })
}

#[async_trait]
impl AgentRuntime for AnthropicRuntime {
    async fn run_turn(
        &self,
        spec: &StageSpec,
        context: &ConversationContext,
        search: Option<&SearchClient>,
    ) -> Result<String, AgentError> {
        let tool_active = spec.search_enabled && search.is_some();
        let mut messages = vec![json!({
            "role": "user",
            "content": turn_request(spec, context),
        })];
        let mut rounds = 0;

        loop {
            let allow_tool_call = tool_active && rounds < MAX_TOOL_ROUNDS;
            let body = self.build_request_body(spec, &messages, tool_active, allow_tool_call);
            let response = self.post(&body).await?;

            match Self::parse_response(&response)? {
                TurnReply::Text(text) => return Ok(text),
                TurnReply::SearchCall { id, query } => {
                    if !allow_tool_call {
                        return Err(AgentError::InvalidResponse(
                            "tool call after the search budget was spent".to_string(),
                        ));
                    }
                    rounds += 1;

                    // A search failure degrades to an empty result set inside
                    // the turn; the model is told no sources were available.
                    let results = match search {
                        Some(s) => s.search(&query, s.max_results()).await,
                        None => Vec::new(),
                    };
                    tracing::debug!(
                        stage = spec.name.label(),
                        query = %query,
                        hits = results.len(),
                        round = rounds,
                        "web search round completed"
                    );

                    messages.push(json!({
                        "role": "assistant",
                        "content": response.get("content").cloned().unwrap_or_else(|| json!([])),
                    }));
                    messages.push(json!({
                        "role": "user",
                        "content": [{
                            "type": "tool_result",
                            "tool_use_id": id,
                            "content": format_search_results(&results),
                        }]
                    }));
                }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
