// ABOUTME: Provides ConversationContext, the append-only record of stage outputs.
// ABOUTME: Each successful stage appends exactly one entry; no entry is ever rewritten.

use serde::{Deserialize, Serialize};

use crate::stage::StageName;

/// One stage's contribution to the accumulated conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub stage: StageName,
    pub text: String,
}

/// The ordered sequence of stage outputs accumulated as the pipeline runs.
///
/// Append-only by construction: `push` is the only mutator, and each stage
/// reads the full prefix before appending its own entry. Search snippets are
/// deliberately absent here; they are ephemeral scaffolding for a single
/// turn, not pipeline state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationContext {
    idea: String,
    entries: Vec<ContextEntry>,
}

impl ConversationContext {
    /// Create an empty context anchored on the raw business idea.
    pub fn new(idea: String) -> Self {
        Self {
            idea,
            entries: Vec::new(),
        }
    }

    /// The user-supplied business idea, unchanged since pipeline start.
    pub fn idea(&self) -> &str {
        &self.idea
    }

    /// Append one stage's output. Called exactly once per successful stage.
    pub fn push(&mut self, stage: StageName, text: String) {
        self.entries.push(ContextEntry { stage, text });
    }

    /// The accumulated entries, in pipeline order.
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the idea and all prior stage outputs into prompt text.
    ///
    /// Each entry appears under its report section heading so later agents
    /// can reference earlier analyses by name.
    pub fn render(&self) -> String {
        let mut out = format!("Business idea: \"{}\"", self.idea);
        for entry in &self.entries {
            out.push_str("\n\n[");
            out.push_str(entry.stage.section_title());
            out.push_str("]\n");
            out.push_str(&entry.text);
        }
        out
    }
}
