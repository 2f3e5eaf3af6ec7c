// ABOUTME: Defines StageOutcome, the tagged result of one stage execution.
// ABOUTME: A StageRecord pairs an outcome with the stage that produced it.

use serde::{Deserialize, Serialize};

use crate::stage::StageName;

/// The result of executing one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StageOutcome {
    Success { text: String },
    Failure { reason: String },
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success { .. })
    }

    /// The stage's output text, if it succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            StageOutcome::Success { text } => Some(text),
            StageOutcome::Failure { .. } => None,
        }
    }
}

/// One stage's outcome, tagged with the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: StageName,
    pub outcome: StageOutcome,
}
