// ABOUTME: End-to-end smoke test for a full validation run.
// ABOUTME: Drives all five stages with a stub runtime and checks the assembled report and export.

use std::sync::Arc;

use chrono::Utc;

use wringer_agent::{AgentRuntime, PipelineOrchestrator};
use wringer_agent::testing::StubAgentRuntime;
use wringer_core::export::{export_markdown, report_filename};
use wringer_core::{SectionBody, assemble};

const IDEA: &str = "an AI tool that helps coffee shops choose locations";

#[tokio::test]
async fn smoke_test_full_validation_run() {
    let texts = [
        "CLARIFIED IDEA: location intelligence for specialty coffee",
        "MARKET SIZE: specialty coffee is a growing multi-billion dollar market",
        "DIRECT COMPETITORS: generic site-selection platforms",
        "STRENGTHS: focused vertical; WEAKNESSES: small initial dataset",
        "STRATEGIC FEEDBACK: validate with ten shop owners before building",
    ];
    let stub = Arc::new(StubAgentRuntime::succeeding(&texts));
    let orchestrator = PipelineOrchestrator::new(Arc::clone(&stub) as Arc<dyn AgentRuntime>, None);

    // 1. Run the pipeline to completion.
    let run = orchestrator.run(IDEA).await.expect("pipeline should complete");
    assert_eq!(run.records.len(), 5);
    assert_eq!(stub.call_count(), 5);
    assert_eq!(run.context.len(), 5);

    // 2. Assemble the report and verify the fixed section contract.
    let report = assemble(run.run_id, IDEA, &run.records, Utc::now());

    let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Clarified Business Idea",
            "Market Research",
            "Competitive Analysis",
            "SWOT Analysis",
            "Strategic Feedback",
        ]
    );

    for (section, expected) in report.sections.iter().zip(texts) {
        match &section.body {
            SectionBody::Text { text } => assert_eq!(text.as_str(), expected),
            other => panic!("expected verbatim stage text, got {:?}", other),
        }
    }

    // 3. Persist the report the way the CLI does and verify the document.
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(report_filename(report.generated_at));
    std::fs::write(&path, export_markdown(&report)).unwrap();

    let md = std::fs::read_to_string(&path).unwrap();
    assert!(md.starts_with("# Business Validation Report"));
    assert!(md.contains(&format!("**Business Idea:** {}", IDEA)));
    assert!(md.contains("### SWOT Analysis"));
    assert!(md.contains("validate with ten shop owners before building"));
}

#[tokio::test]
async fn smoke_test_clarifier_failure_yields_clear_abort() {
    let stub = Arc::new(StubAgentRuntime::with_replies(vec![Err(
        "authentication rejected".to_string(),
    )]));
    let orchestrator = PipelineOrchestrator::new(Arc::clone(&stub) as Arc<dyn AgentRuntime>, None);

    let aborted = orchestrator.run(IDEA).await.unwrap_err();

    assert_eq!(stub.call_count(), 1, "no later stage may run after a clarifier failure");
    assert!(aborted.to_string().contains("clarifier"));
    assert!(aborted.to_string().contains("authentication rejected"));

    // The partial report still carries all five sections, as placeholders.
    let report = assemble(aborted.run_id, IDEA, &aborted.records, Utc::now());
    assert_eq!(report.sections.len(), 5);
    assert!(
        report
            .sections
            .iter()
            .all(|s| matches!(s.body, SectionBody::NotRun))
    );
}
