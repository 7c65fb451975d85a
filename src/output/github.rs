use crate::parser::Verdict;
use crate::runner::ReviewReport;

use super::table::verdict_label;

/// GitHub Actions `::warning` workflow commands for results below `annotate_below`
/// and for unparseable replies. N/A results are never annotated.
pub fn render_github_annotations(report: &ReviewReport, annotate_below: i64) -> String {
    let mut out = String::new();

    for result in &report.results {
        let message = match result.verdict {
            Verdict::Scored(score) if score < annotate_below => format!(
                "Policy '{}' scored {}: {}",
                result.policy_name,
                verdict_label(&result.verdict, report.scale.max),
                result.comment
            ),
            Verdict::Unparseable => format!(
                "Policy '{}' could not be evaluated: the model reply was unparseable",
                result.policy_name
            ),
            _ => continue,
        };

        out.push_str(&format!(
            "::warning title={}::{}\n",
            escape_property(&format!("policyrev: {}", result.policy_name)),
            escape_data(&message)
        ));
    }

    out
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
