// ABOUTME: Defines the Report aggregate and the assemble() function that builds it.
// ABOUTME: Assembly is pure and deterministic given its inputs; the timestamp is passed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::outcome::{StageOutcome, StageRecord};
use crate::stage::StageName;

/// The body of one report section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    /// The stage succeeded; holds its output text verbatim.
    Text { text: String },
    /// The stage ran but failed; the report carries an explicit placeholder.
    Failed { reason: String },
    /// The pipeline aborted before this stage ran.
    NotRun,
}

/// One section of the final report, in fixed pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub stage: StageName,
    pub title: String,
    pub body: SectionBody,
}

/// The final validation report: the original idea, a generation timestamp,
/// and exactly one section per pipeline stage regardless of failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub run_id: Ulid,
    pub idea: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<ReportSection>,
}

/// Merge the stage records into a Report with the fixed section ordering.
///
/// Sections always appear in declared pipeline order and the section count
/// is invariant across runs: a failed stage renders as an explicit failure
/// placeholder, and a stage the pipeline never reached renders as NotRun.
pub fn assemble(
    run_id: Ulid,
    idea: &str,
    records: &[StageRecord],
    generated_at: DateTime<Utc>,
) -> Report {
    let sections = StageName::ALL
        .into_iter()
        .map(|stage| {
            let body = match records.iter().find(|r| r.stage == stage) {
                Some(record) => match &record.outcome {
                    StageOutcome::Success { text } => SectionBody::Text { text: text.clone() },
                    StageOutcome::Failure { reason } => SectionBody::Failed {
                        reason: reason.clone(),
                    },
                },
                None => SectionBody::NotRun,
            };
            ReportSection {
                stage,
                title: stage.section_title().to_string(),
                body,
            }
        })
        .collect();

    Report {
        run_id,
        idea: idea.to_string(),
        generated_at,
        sections,
    }
}
