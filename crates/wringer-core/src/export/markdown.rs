// ABOUTME: Renders a Report as a deterministic Markdown document.
// ABOUTME: Section ordering is fixed; failed stages render explicit placeholders.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::report::{Report, SectionBody};

/// Render a Report as a Markdown string.
///
/// Deterministic given the Report value: two calls with identical reports
/// produce byte-identical documents. The five analysis sections appear in
/// fixed pipeline order with one `###` heading each.
pub fn export_markdown(report: &Report) -> String {
    let mut out = String::new();

    writeln!(out, "# Business Validation Report").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "**Business Idea:** {}", report.idea).unwrap();
    writeln!(
        out,
        "**Date:** {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Executive Summary").unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "This report provides a validation analysis of the business idea, produced by a \
         pipeline of specialized AI agents with web research."
    )
    .unwrap();
    writeln!(out).unwrap();
    writeln!(out, "## Analysis Results").unwrap();

    for section in &report.sections {
        writeln!(out).unwrap();
        writeln!(out, "### {}", section.title).unwrap();
        writeln!(out).unwrap();
        match &section.body {
            SectionBody::Text { text } => writeln!(out, "{}", text).unwrap(),
            SectionBody::Failed { reason } => {
                writeln!(out, "_This section could not be generated: {}_", reason).unwrap();
            }
            SectionBody::NotRun => {
                writeln!(out, "_The pipeline aborted before this stage ran._").unwrap();
            }
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "## Recommendations").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Based on the analysis above, consider the following next steps:").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "1. Validate assumptions with potential customers").unwrap();
    writeln!(out, "2. Create a minimum viable product (MVP)").unwrap();
    writeln!(out, "3. Test the business model with early adopters").unwrap();
    writeln!(out, "4. Refine the value proposition based on feedback").unwrap();
    writeln!(out, "5. Develop a go-to-market strategy").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "---").unwrap();
    writeln!(out, "*Report generated by wringer*").unwrap();

    out
}

/// Build the timestamped filename the report writer persists a report under.
pub fn report_filename(generated_at: DateTime<Utc>) -> String {
    format!(
        "business_validation_report_{}.md",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}
