// ABOUTME: Entry point for the wringer binary.
// ABOUTME: Collects the business idea, runs the validation pipeline, and writes the report.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;

use wringer_agent::{PipelineOrchestrator, SearchClient, WringerConfig, create_runtime};
use wringer_core::export::{export_markdown, report_filename};
use wringer_core::{Report, assemble};

#[derive(Debug, Parser)]
#[command(
    name = "wringer",
    about = "Validate a business idea with a pipeline of specialized AI agents"
)]
struct Args {
    /// The business idea to validate; prompted for interactively when omitted.
    idea: Option<String>,

    /// Directory the markdown report is written into.
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// LLM provider to use (anthropic or openai); overrides WRINGER_PROVIDER.
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier; overrides the provider default.
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wringer=info".parse().unwrap()),
        )
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = WringerConfig::from_env()?;
    let provider = args.provider.unwrap_or_else(|| config.provider.clone());
    let model = args.model.or_else(|| config.model.clone());

    tracing::info!(
        provider = %provider,
        model = model.as_deref().unwrap_or("provider default"),
        "wringer starting up"
    );

    let idea = match args.idea {
        Some(idea) => idea,
        None => prompt_for_idea()?,
    };
    let idea = idea.trim().to_string();
    anyhow::ensure!(!idea.is_empty(), "please provide a business idea to validate");

    let runtime = create_runtime(&provider, model.as_deref())?;
    let search = Arc::new(SearchClient::new(
        config.search_url.clone(),
        config.search_max_results,
    ));
    let orchestrator = PipelineOrchestrator::new(runtime, Some(search));

    println!("Validating: {idea}");

    match orchestrator.run(&idea).await {
        Ok(run) => {
            let report = assemble(run.run_id, &idea, &run.records, Utc::now());
            let path = write_report(&args.output, &report)?;
            println!("Report saved to: {}", path.display());
            Ok(())
        }
        Err(aborted) => {
            // Whatever stages did complete still go into a partial report.
            if !aborted.records.is_empty() {
                let report = assemble(aborted.run_id, &idea, &aborted.records, Utc::now());
                let path = write_report(&args.output, &report)?;
                println!("Partial report saved to: {}", path.display());
            }
            Err(aborted.into())
        }
    }
}

/// Prompt the operator for an idea on stdin.
fn prompt_for_idea() -> anyhow::Result<String> {
    print!("Enter your business idea: ");
    std::io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read idea from stdin")?;
    Ok(line)
}

/// Render the report as markdown and persist it under a timestamped filename.
fn write_report(dir: &Path, report: &Report) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let path = dir.join(report_filename(report.generated_at));
    std::fs::write(&path, export_markdown(report))
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(path)
}
