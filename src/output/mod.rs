mod github;
mod json;
mod report;
mod table;

pub use github::render_github_annotations;
pub use json::{render_json, JsonReport, JsonResult};
pub use report::{dated_report_dir, render_markdown, write_report, JSON_FILE, MARKDOWN_FILE};
pub use table::{render_table, verdict_label};

use crate::config::OutputFormat;
use crate::error::OutputError;
use crate::runner::ReviewReport;

/// Render `report` in the requested console format
pub fn render(
    report: &ReviewReport,
    format: OutputFormat,
    annotate_below: i64,
) -> Result<String, OutputError> {
    Ok(match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::Markdown => render_markdown(report),
        OutputFormat::Json => render_json(report)?,
        OutputFormat::Github => render_github_annotations(report, annotate_below),
    })
}
