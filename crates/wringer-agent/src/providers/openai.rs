// ABOUTME: OpenAI API adapter implementing the AgentRuntime trait.
// ABOUTME: Runs one stage turn against Chat Completions, mediating optional web_search function calls.

use async_trait::async_trait;
use serde_json::{Value, json};

use wringer_core::{ConversationContext, StageSpec};

use crate::providers::{
    MAX_TOOL_ROUNDS, SEARCH_TOOL_DESCRIPTION, SEARCH_TOOL_NAME, TurnReply, format_search_results,
    search_tool_schema, turn_request,
};
use crate::runtime::{AgentError, AgentRuntime};
use crate::search::SearchClient;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(120);

/// OpenAI runtime adapter. Calls the Chat Completions API once per stage
/// turn, looping through bounded web_search function-call rounds when the
/// stage carries the search capability.
pub struct OpenAIRuntime {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIRuntime {
    /// Create a new OpenAIRuntime with explicit configuration.
    pub fn new(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
        }
    }

    /// Build the JSON request body for the OpenAI Chat Completions API.
    /// The stage instruction travels as the system message; the web_search
    /// function is attached only while `tool_active`.
    pub fn build_request_body(
        &self,
        spec: &StageSpec,
        messages: &[Value],
        tool_active: bool,
        allow_tool_call: bool,
    ) -> Value {
        let mut all_messages = vec![json!({
            "role": "system",
            "content": spec.instruction,
        })];
        all_messages.extend(messages.iter().cloned());

        let mut body = json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "messages": all_messages,
        });

        if tool_active {
            body["tools"] = json!([{
                "type": "function",
                "function": {
                    "name": SEARCH_TOOL_NAME,
                    "description": SEARCH_TOOL_DESCRIPTION,
                    "parameters": search_tool_schema(),
                }
            }]);
            body["tool_choice"] = if allow_tool_call {
                json!("auto")
            } else {
                json!("none")
            };
        }

        body
    }

    /// Parse an OpenAI Chat Completions response into a TurnReply.
    pub(crate) fn parse_response(response_body: &Value) -> Result<TurnReply, AgentError> {
        let message = response_body
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .ok_or_else(|| {
                AgentError::InvalidResponse("missing choices/message in response".to_string())
            })?;

        // tool_calls take priority over any interleaved content
        if let Some(tool_call) = message
            .get("tool_calls")
            .and_then(|t| t.as_array())
            .and_then(|arr| arr.first())
        {
            return parse_tool_call(tool_call);
        }

        if let Some(content) = message.get("content").and_then(|c| c.as_str())
            && !content.is_empty()
        {
            return Ok(TurnReply::Text(content.to_string()));
        }

        Err(AgentError::InvalidResponse(
            "no text content in response".to_string(),
        ))
    }

    /// POST the request body and map HTTP-level failures onto AgentError.
    async fn post(&self, body: &Value) -> Result<Value, AgentError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
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
            return Err(AgentError::Unauthorized("check OPENAI_API_KEY".to_string()));
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

/// Parse a web_search tool_call into a TurnReply::SearchCall. OpenAI encodes
/// function arguments as a JSON string, so they are decoded here.
fn parse_tool_call(tool_call: &Value) -> Result<TurnReply, AgentError> {
    let id = tool_call
        .get("id")
        .and_then(|i| i.as_str())
        .ok_or_else(|| AgentError::InvalidResponse("tool_call missing id".to_string()))?
        .to_string();

    let function = tool_call
        .get("function")
        .ok_or_else(|| AgentError::InvalidResponse("tool_call missing function".to_string()))?;

    let name = function
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| AgentError::InvalidResponse("function missing name".to_string()))?;

    if name != SEARCH_TOOL_NAME {
        return Err(AgentError::InvalidResponse(format!("unknown tool: {}", name)));
    }

    let arguments_str = function
        .get("arguments")
        .and_then(|a| a.as_str())
        .unwrap_or("{}");

    let arguments: Value = serde_json::from_str(arguments_str).map_err(|e| {
        AgentError::InvalidResponse(format!("failed to parse function arguments: {}", e))
    })?;

    let query = arguments
        .get("query")
        .and_then(|q| q.as_str())
        .ok_or_else(|| {
            AgentError::InvalidResponse("web_search call missing query".to_string())
        })?
        .to_string();

    Ok(TurnReply::SearchCall { id, query })
}

#[async_trait]
impl AgentRuntime for OpenAIRuntime {
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

                    let assistant_message = response
                        .get("choices")
                        .and_then(|c| c.as_array())
                        .and_then(|arr| arr.first())
                        .and_then(|choice| choice.get("message"))
                        .cloned()
                        .unwrap_or_else(|| json!({"role": "assistant", "content": null}));
                    messages.push(assistant_message);
                    messages.push(json!({
                        "role": "tool",
                        "tool_call_id": id,
                        "content": format_search_results(&results),
                    }));
                }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
