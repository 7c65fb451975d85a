use crate::error::CollectionError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Include/exclude glob pair matched against paths relative to the review root
pub struct PathFilter {
    include: GlobSet,
    exclude: GlobSet,
    match_all: bool,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, CollectionError> {
        Ok(Self {
            include: build_globset(include, "include set")?,
            exclude: build_globset(exclude, "exclude set")?,
            match_all: include.is_empty(),
        })
    }

    pub fn is_match(&self, rel_path: &Path) -> bool {
        if !self.match_all && !self.include.is_match(rel_path) {
            return false;
        }
        !self.exclude.is_match(rel_path)
    }
}

fn build_globset(patterns: &[String], label: &str) -> Result<GlobSet, CollectionError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CollectionError::GlobPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| CollectionError::GlobPattern {
        pattern: label.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_include_matches_everything() {
        let filter = PathFilter::new(&[], &[]).unwrap();
        assert!(filter.is_match(Path::new("src/main.rs")));
        assert!(filter.is_match(Path::new("README.md")));
    }

    #[test]
    fn test_include_and_exclude() {
        let filter = PathFilter::new(
            &patterns(&["**/*.py"]),
            &patterns(&["**/__pycache__/**", "tests/**"]),
        )
        .unwrap();
        assert!(filter.is_match(Path::new("app/service.py")));
        assert!(filter.is_match(Path::new("main.py")));
        assert!(!filter.is_match(Path::new("app/README.md")));
        assert!(!filter.is_match(Path::new("app/__pycache__/service.py")));
        assert!(!filter.is_match(Path::new("tests/test_service.py")));
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let err = PathFilter::new(&patterns(&["src/[unclosed"]), &[]).err().unwrap();
        assert!(matches!(err, CollectionError::GlobPattern { pattern, .. } if pattern == "src/[unclosed"));
    }
}
