// ABOUTME: Agent system for wringer: LLM runtime adapters and the pipeline orchestrator.
// ABOUTME: Drives five role-specialized agent turns sequentially over a shared context.

pub mod client;
pub mod config;
pub mod pipeline;
pub mod providers;
pub mod runtime;
pub mod search;
pub mod testing;

pub use client::create_runtime;
pub use config::{ConfigError, WringerConfig};
pub use pipeline::{PipelineAborted, PipelineOrchestrator, PipelineRun, PipelineState};
pub use runtime::{AgentError, AgentRuntime};
pub use search::{SearchClient, SearchResult};
