// ABOUTME: PipelineOrchestrator drives the five stages sequentially over one shared context.
// ABOUTME: Implements the Pending/Running/Completed/Aborted state machine with degrade-not-abort policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ulid::Ulid;

use wringer_core::{
    ConversationContext, StageName, StageOutcome, StageRecord, StageSpec, pipeline_stages,
};

use crate::runtime::AgentRuntime;
use crate::search::SearchClient;

/// Observable lifecycle of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Pending,
    Running(usize),
    Completed,
    Aborted { stage: usize, reason: String },
}

/// A run that reached Completed: exactly one record per stage, plus the
/// final conversation context.
#[derive(Debug)]
pub struct PipelineRun {
    pub run_id: Ulid,
    pub records: Vec<StageRecord>,
    pub context: ConversationContext,
}

/// A run that reached Aborted. Carries the partial records and context so
/// the caller can still produce a partial report.
#[derive(Debug, thiserror::Error)]
#[error("pipeline aborted at stage {stage_index} ({stage}): {reason}")]
pub struct PipelineAborted {
    pub run_id: Ulid,
    pub stage_index: usize,
    pub stage: StageName,
    pub reason: String,
    pub records: Vec<StageRecord>,
    pub context: ConversationContext,
}

/// Decide whether a stage failure aborts the run.
///
/// The clarifier's output feeds every later prompt, so without it the rest
/// of the pipeline is meaningless; any later stage degrades to a placeholder
/// instead. Search failures never reach this decision at all: the search
/// client absorbs them inside the turn.
fn failure_is_fatal(stage_index: usize) -> bool {
    stage_index == 0
}

/// Owns the five fixed stage specs and drives them strictly sequentially:
/// each stage's prompt context contains exactly the successful outputs of
/// the stages before it, in order.
///
/// No stage is retried; a single failed attempt per stage is final. Bounded
/// retry could be added around the `run_turn` call site without changing the
/// state machine's shape.
pub struct PipelineOrchestrator {
    stages: [StageSpec; 5],
    runtime: Arc<dyn AgentRuntime>,
    search: Option<Arc<SearchClient>>,
    cancelled: Arc<AtomicBool>,
}

impl PipelineOrchestrator {
    /// Create an orchestrator over the declared stage sequence.
    pub fn new(runtime: Arc<dyn AgentRuntime>, search: Option<Arc<SearchClient>>) -> Self {
        Self {
            stages: pipeline_stages(),
            runtime,
            search,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for cancelling a run from another task. Once set, the
    /// orchestrator stops before issuing the next stage call; a partially
    /// executed stage is never recorded as Success.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run the full pipeline for one idea.
    ///
    /// On the success path the result carries exactly one record per stage
    /// (failed later stages included, as Failure records). An abort
    /// returns the partial records and context accumulated so far.
    pub async fn run(&self, idea: &str) -> Result<PipelineRun, PipelineAborted> {
        let run_id = Ulid::new();
        let mut state = PipelineState::Pending;
        let mut context = ConversationContext::new(idea.to_string());
        let mut records: Vec<StageRecord> = Vec::with_capacity(self.stages.len());

        tracing::info!(
            %run_id,
            idea,
            provider = self.runtime.provider_name(),
            state = ?state,
            "pipeline starting"
        );

        for (i, spec) in self.stages.iter().enumerate() {
            if self.is_cancelled() {
                state = PipelineState::Aborted {
                    stage: i,
                    reason: "cancelled".to_string(),
                };
                tracing::warn!(%run_id, stage = spec.name.label(), state = ?state, "run cancelled, stopping before stage");
                return Err(PipelineAborted {
                    run_id,
                    stage_index: i,
                    stage: spec.name,
                    reason: "cancelled".to_string(),
                    records,
                    context,
                });
            }

            state = PipelineState::Running(i);
            tracing::info!(%run_id, stage = spec.name.label(), state = ?state, "running stage");

            let search = if spec.search_enabled {
                self.search.as_deref()
            } else {
                None
            };

            match self.runtime.run_turn(spec, &context, search).await {
                Ok(text) => {
                    context.push(spec.name, text.clone());
                    records.push(StageRecord {
                        stage: spec.name,
                        outcome: StageOutcome::Success { text },
                    });
                    tracing::info!(%run_id, stage = spec.name.label(), context_len = context.len(), "stage succeeded");
                }
                Err(err) if failure_is_fatal(i) => {
                    state = PipelineState::Aborted {
                        stage: i,
                        reason: err.to_string(),
                    };
                    tracing::error!(%run_id, stage = spec.name.label(), state = ?state, error = %err, "prerequisite stage failed, aborting run");
                    return Err(PipelineAborted {
                        run_id,
                        stage_index: i,
                        stage: spec.name,
                        reason: err.to_string(),
                        records,
                        context,
                    });
                }
                Err(err) => {
                    tracing::warn!(%run_id, stage = spec.name.label(), error = %err, "stage failed, continuing with placeholder");
                    records.push(StageRecord {
                        stage: spec.name,
                        outcome: StageOutcome::Failure {
                            reason: err.to_string(),
                        },
                    });
                }
            }
        }

        state = PipelineState::Completed;
        tracing::info!(%run_id, state = ?state, "pipeline completed");

        Ok(PipelineRun {
            run_id,
            records,
            context,
        })
    }
}
