// ABOUTME: Provider module aggregating all LLM runtime adapters.
// ABOUTME: Shared prompt plumbing and the web_search tool contract live here.

pub mod anthropic;
pub mod openai;

use wringer_core::{ConversationContext, StageSpec};

use crate::search::SearchResult;

/// Upper bound on web-search rounds within a single agent turn. After the
/// budget is spent the adapter forces a final text answer.
pub(crate) const MAX_TOOL_ROUNDS: usize = 3;

/// Name of the search tool advertised to search-enabled stages.
pub(crate) const SEARCH_TOOL_NAME: &str = "web_search";

/// Description of the search tool advertised to search-enabled stages.
pub(crate) const SEARCH_TOOL_DESCRIPTION: &str =
    "Search the web for current information. Returns result titles, snippets, and URLs. \
     May return no results when the search provider is unavailable.";

/// JSON Schema for the search tool's input, shared by both adapters.
pub(crate) fn search_tool_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The search query"
            }
        },
        "required": ["query"]
    })
}

/// What a single model response asks the adapter to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TurnReply {
    /// The model produced its final text for this turn.
    Text(String),
    /// The model invoked the web_search tool; run it and continue the turn.
    SearchCall { id: String, query: String },
}

/// Build the user message that opens an agent turn: the serialized
/// conversation so far plus the request to produce this stage's analysis.
/// Shared across providers so all adapters prompt consistently.
pub(crate) fn turn_request(spec: &StageSpec, context: &ConversationContext) -> String {
    format!(
        "{}\n\nProduce your {} analysis now, following your response structure exactly.",
        context.render(),
        spec.name.section_title()
    )
}

/// Fold search results into text the model receives as the tool result.
/// An empty result set is reported explicitly so the model knows to fall
/// back on its own knowledge.
pub(crate) fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No search results were found. Continue from your own knowledge and note \
                that no current sources were available."
            .to_string();
    }

    let mut out = String::from("WEB SEARCH RESULTS:");
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} ({})\n   {}",
            i + 1,
            result.title,
            result.url,
            result.snippet
        ));
    }
    out
}
