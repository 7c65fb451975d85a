use crate::parser::Verdict;
use crate::runner::ReviewReport;

pub(crate) const TITLE: &str = "Policy Evaluation Report";

const HEADERS: [&str; 3] = ["Policy", "Verdict", "Comment"];
const POLICY_WIDTH: usize = 32;
const COMMENT_WIDTH: usize = 60;

/// `4/5`, `N/A` or `UNPARSEABLE`
pub fn verdict_label(verdict: &Verdict, max: i64) -> String {
    match verdict {
        Verdict::Scored(score) => format!("{}/{}", score, max),
        other => other.to_string(),
    }
}

/// Console table of every result, comments wrapped to a fixed width
pub fn render_table(report: &ReviewReport) -> String {
    let rows: Vec<[Vec<String>; 3]> = report
        .results
        .iter()
        .map(|r| {
            [
                wrap(&r.policy_name, POLICY_WIDTH),
                vec![verdict_label(&r.verdict, report.scale.max)],
                wrap(&r.comment, COMMENT_WIDTH),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (col, cell) in row.iter().enumerate() {
            for line in cell {
                widths[col] = widths[col].max(line.chars().count());
            }
        }
    }

    let rule = border(&widths);
    let inner = rule.chars().count() - 2;

    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("|{:^inner$}|\n", TITLE, inner = inner));
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&row_line(&HEADERS.map(String::from), &widths));
    out.push_str(&rule);
    out.push('\n');

    for row in &rows {
        let height = row.iter().map(Vec::len).max().unwrap_or(1);
        for i in 0..height {
            let cells = [
                row[0].get(i).cloned().unwrap_or_default(),
                row[1].get(i).cloned().unwrap_or_default(),
                row[2].get(i).cloned().unwrap_or_default(),
            ];
            out.push_str(&row_line(&cells, &widths));
        }
        out.push_str(&rule);
        out.push('\n');
    }

    out.push_str(&footer(report));
    out.push('\n');
    out
}

/// One-line tally under the table
pub(crate) fn footer(report: &ReviewReport) -> String {
    let mut line = format!("{} policies reviewed", report.results.len());
    if let Some(avg) = report.average_score() {
        line.push_str(&format!(", average {:.1}/{}", avg, report.scale.max));
    }
    let sentinels = report.sentinel_count();
    if sentinels > 0 {
        line.push_str(&format!(", {} unparseable", sentinels));
    }
    if report.corpus.truncated {
        line.push_str(&format!(
            " (corpus truncated to {} of {} characters)",
            report.corpus.sent_characters, report.corpus.characters
        ));
    }
    line
}

fn border(widths: &[usize; 3]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn row_line(cells: &[String; 3], widths: &[usize; 3]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    format!("| {} |\n", padded.join(" | "))
}

/// Greedy word wrap; words longer than `width` are split
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }

            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    #[test]
    fn test_verdict_labels() {
        assert_eq!(verdict_label(&Verdict::Scored(4), 5), "4/5");
        assert_eq!(verdict_label(&Verdict::NotApplicable, 5), "N/A");
        assert_eq!(verdict_label(&Verdict::Unparseable, 5), "UNPARSEABLE");
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "Business rules live in services but the HTTP handlers also reach into the ORM directly";
        let lines = wrap(text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_splits_long_words_and_keeps_empty_cell() {
        let lines = wrap(&"x".repeat(25), 10);
        assert_eq!(lines, vec!["x".repeat(10), "x".repeat(10), "x".repeat(5)]);
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn test_table_layout() {
        let table = render_table(&sample_report());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[1].contains(TITLE));
        assert!(lines[3].starts_with("| Policy"));
        assert!(table.contains("| 4/5 "));
        assert!(table.contains("| N/A "));
        assert!(table.contains("| UNPARSEABLE "));

        // Every framed line has the same width
        let width = lines[0].chars().count();
        for line in lines.iter().take_while(|l| l.starts_with('+') || l.starts_with('|')) {
            assert_eq!(line.chars().count(), width, "line: {}", line);
        }
        assert!(lines.last().unwrap().starts_with("3 policies reviewed, average 4.0/5, 1 unparseable"));
    }
}
