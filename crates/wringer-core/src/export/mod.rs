// ABOUTME: Export module for rendering a Report into external formats.
// ABOUTME: Markdown is the only format the report writer consumes.

pub mod markdown;

pub use markdown::{export_markdown, report_filename};
