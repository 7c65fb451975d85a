use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const RULE_WIDTH: usize = 40;

/// Source files under review, keyed by `/`-separated path relative to the root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeCorpus {
    files: BTreeMap<String, String>,
}

impl CodeCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Indented directory tree of the collected files
    pub fn directory_tree(&self) -> String {
        let mut lines = Vec::new();
        let mut open_dirs: Vec<&str> = Vec::new();

        for path in self.files.keys() {
            let mut parts: Vec<&str> = path.split('/').collect();
            let file_name = parts.pop().unwrap_or_default();

            // Sorted keys keep every directory's files contiguous
            let shared = open_dirs
                .iter()
                .zip(parts.iter())
                .take_while(|(a, b)| a == b)
                .count();
            open_dirs.truncate(shared);

            for dir in &parts[shared..] {
                lines.push(format!("{}{}/", "  ".repeat(open_dirs.len() + 1), dir));
                open_dirs.push(*dir);
            }
            lines.push(format!("{}{}", "  ".repeat(open_dirs.len() + 1), file_name));
        }

        lines.join("\n")
    }

    /// Render the corpus as the review document sent to the model
    pub fn render(&self, project_name: &str) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut report = vec![
            "Directory Structure:".to_string(),
            project_name.to_string(),
            self.directory_tree(),
            "\nFile Contents:".to_string(),
        ];

        for (path, content) in &self.files {
            report.push(format!("\nFile: {}", path));
            report.push(rule.clone());
            report.push(content.clone());
            report.push(rule.clone());
        }

        report.join("\n")
    }

    /// Short digest identifying exactly which files and contents were reviewed
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for (path, content) in &self.files {
            hasher.update(path.as_bytes());
            hasher.update([0u8]);
            hasher.update(content.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())[..12].to_string()
    }
}

/// First `limit` characters of `text`, never splitting a character
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CodeCorpus {
        let mut corpus = CodeCorpus::new();
        corpus.insert("src/domain/order.py", "class Order: pass");
        corpus.insert("src/infra/db.py", "import sqlite3");
        corpus.insert("main.py", "print('hi')");
        corpus
    }

    #[test]
    fn test_directory_tree() {
        let tree = sample().directory_tree();
        assert_eq!(
            tree,
            "  main.py\n  src/\n    domain/\n      order.py\n    infra/\n      db.py"
        );
    }

    #[test]
    fn test_render_frames_each_file() {
        let rendered = sample().render("shop");
        assert!(rendered.starts_with("Directory Structure:\nshop\n"));
        assert!(rendered.contains("\nFile Contents:"));
        assert!(rendered.contains(&format!(
            "File: src/infra/db.py\n{}\nimport sqlite3\n{}",
            "-".repeat(40),
            "-".repeat(40)
        )));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);

        b.insert("main.py", "print('bye')");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("åäöü", 2), "åä");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
