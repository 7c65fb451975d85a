use crate::error::OutputError;
use crate::runner::ReviewReport;
use chrono::{Local, SecondsFormat};
use std::fs;
use std::path::{Path, PathBuf};

use super::json::render_json;
use super::table::{footer, verdict_label, TITLE};

pub const MARKDOWN_FILE: &str = "policy-review.md";
pub const JSON_FILE: &str = "policy-review.json";

/// `<base>/<YYYY-MM-DD>`, local date
pub fn dated_report_dir(base: &Path) -> PathBuf {
    base.join(Local::now().format("%Y-%m-%d").to_string())
}

/// Write the Markdown and JSON reports into `report_dir`
pub fn write_report(report_dir: &Path, report: &ReviewReport) -> Result<(), OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let md_path = report_dir.join(MARKDOWN_FILE);
    fs::write(&md_path, render_markdown(report)).map_err(OutputError::WriteReport)?;

    let json_path = report_dir.join(JSON_FILE);
    fs::write(&json_path, render_json(report)?).map_err(OutputError::WriteReport)?;

    Ok(())
}

pub fn render_markdown(report: &ReviewReport) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", TITLE));

    md.push_str("| Metric | Value |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!(
        "| Generated | {} |\n",
        report.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    md.push_str(&format!(
        "| Target | `{}` |\n",
        report.target.display()
    ));
    md.push_str(&format!("| Provider | {} |\n", report.provider));
    md.push_str(&format!(
        "| Scale | {}..{} |\n",
        report.scale.min, report.scale.max
    ));
    md.push_str(&format!("| Files | {} |\n", report.corpus.files));
    if report.corpus.truncated {
        md.push_str(&format!(
            "| Corpus | {} of {} characters (truncated) |\n",
            report.corpus.sent_characters, report.corpus.characters
        ));
    } else {
        md.push_str(&format!(
            "| Corpus | {} characters |\n",
            report.corpus.characters
        ));
    }
    md.push_str(&format!(
        "| Fingerprint | `{}` |\n",
        report.corpus.fingerprint
    ));
    md.push_str(&format!(
        "| Duration | {:.1}s |\n",
        report.total_duration.as_secs_f64()
    ));
    md.push_str("\n---\n\n");

    md.push_str("## Results\n\n");
    md.push_str("| Policy | Verdict | Comment |\n");
    md.push_str("|--------|---------|---------|\n");
    for result in &report.results {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&result.policy_name),
            verdict_label(&result.verdict, report.scale.max),
            escape_cell(&result.comment)
        ));
    }
    md.push('\n');
    md.push_str(&format!("*{}*\n", footer(report)));

    md
}

/// Keep a value inside one Markdown table cell
fn escape_cell(value: &str) -> String {
    value
        .trim()
        .replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
