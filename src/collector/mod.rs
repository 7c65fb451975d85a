mod corpus;
mod filter;

pub use corpus::{truncate_chars, CodeCorpus};
pub use filter::PathFilter;

use crate::config::CollectConfig;
use crate::error::CollectionError;
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, info};

/// Bytes inspected for NUL when sniffing binary files
const BINARY_SNIFF_LEN: usize = 8 * 1024;

/// Read every text file under `root` into a corpus
pub fn collect_corpus(root: &Path, config: &CollectConfig) -> Result<CodeCorpus, CollectionError> {
    if !root.exists() {
        return Err(CollectionError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CollectionError::NotADirectory(root.to_path_buf()));
    }

    // An unreadable root is fatal; unreadable entries below it are skipped
    std::fs::read_dir(root)?;

    let filter = PathFilter::new(&config.include, &config.exclude)?;

    // Use ignore crate to respect .gitignore, even outside a git checkout
    let walker = WalkBuilder::new(root)
        .hidden(!config.include_hidden)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut corpus = CodeCorpus::new();
    let mut skipped = 0usize;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                skipped += 1;
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.path();
        let rel_path = path.strip_prefix(root).unwrap_or(path);

        if !filter.is_match(rel_path) {
            continue;
        }

        match read_text(path, config.max_file_bytes) {
            Ok(FileRead::Text(text)) => corpus.insert(corpus_key(rel_path), text),
            Ok(FileRead::TooLarge(size)) => {
                debug!("Skipping {} ({} bytes, over limit)", rel_path.display(), size);
                skipped += 1;
            }
            Ok(FileRead::Binary) => {
                debug!("Skipping binary file {}", rel_path.display());
                skipped += 1;
            }
            Err(e) => {
                debug!("Skipping {} ({})", rel_path.display(), e);
                skipped += 1;
            }
        }
    }

    info!(
        "Collected {} files from {} ({} skipped)",
        corpus.len(),
        root.display(),
        skipped
    );
    Ok(corpus)
}

enum FileRead {
    Text(String),
    TooLarge(u64),
    Binary,
}

fn read_text(path: &Path, max_bytes: u64) -> std::io::Result<FileRead> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Ok(FileRead::TooLarge(size));
    }

    let bytes = std::fs::read(path)?;
    Ok(decode_text(bytes).map_or(FileRead::Binary, FileRead::Text))
}

fn decode_text(bytes: Vec<u8>) -> Option<String> {
    let sniff = &bytes[..bytes.len().min(BINARY_SNIFF_LEN)];
    if sniff.contains(&0) {
        return None;
    }
    String::from_utf8(bytes).ok()
}

/// `/`-separated key so corpus output is identical across platforms
fn corpus_key(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &[u8]) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_round_trip_two_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", b"x");
        write(dir.path(), "b.txt", b"y");

        let corpus = collect_corpus(dir.path(), &CollectConfig::default()).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get("a.txt"), Some("x"));
        assert_eq!(corpus.get("b.txt"), Some("y"));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = collect_corpus(&missing, &CollectConfig::default()).unwrap_err();
        assert!(matches!(err, CollectionError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_file_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", b"x");
        let err = collect_corpus(&dir.path().join("a.txt"), &CollectConfig::default()).unwrap_err();
        assert!(matches!(err, CollectionError::NotADirectory(_)));
    }

    #[test]
    fn test_nested_paths_use_forward_slashes() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "pkg/domain/model.py", b"class M: pass");

        let corpus = collect_corpus(dir.path(), &CollectConfig::default()).unwrap();
        assert_eq!(corpus.get("pkg/domain/model.py"), Some("class M: pass"));
    }

    #[test]
    fn test_skips_binary_hidden_and_ignored() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.py", b"def f(): pass");
        write(dir.path(), "logo.png", &[0x89, b'P', b'N', b'G', 0, 0, 1]);
        write(dir.path(), ".env", b"SECRET=1");
        write(dir.path(), ".gitignore", b"build/\n");
        write(dir.path(), "build/out.py", b"generated");
        write(dir.path(), "node_modules/lib/index.js", b"module.exports = 1");

        let corpus = collect_corpus(dir.path(), &CollectConfig::default()).unwrap();
        let paths: Vec<_> = corpus.paths().collect();
        assert_eq!(paths, vec!["keep.py"]);
    }

    #[test]
    fn test_include_hidden() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".github/workflows/ci.yml", b"on: push");
        write(dir.path(), ".git/HEAD", b"ref: refs/heads/main");

        let config = CollectConfig {
            include_hidden: true,
            ..CollectConfig::default()
        };
        let corpus = collect_corpus(dir.path(), &config).unwrap();
        let paths: Vec<_> = corpus.paths().collect();
        assert_eq!(paths, vec![".github/workflows/ci.yml"]);
    }

    #[test]
    fn test_include_globs_and_size_limit() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/app.py", b"x = 1");
        write(dir.path(), "src/big.py", &[b'a'; 64]);
        write(dir.path(), "README.md", b"# readme");

        let config = CollectConfig {
            include: vec!["**/*.py".to_string()],
            max_file_bytes: 32,
            ..CollectConfig::default()
        };
        let corpus = collect_corpus(dir.path(), &config).unwrap();
        let paths: Vec<_> = corpus.paths().collect();
        assert_eq!(paths, vec!["src/app.py"]);
    }

    #[test]
    fn test_vanished_file_is_an_error_for_the_reader_only() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_text(&dir.path().join("gone.py"), 1024),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        write(dir.path(), "ok.py", b"x = 1");
        write(dir.path(), "locked.py", b"y = 2");
        let locked = dir.path().join("locked.py");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not apply to root
        if fs::read(&locked).is_ok() {
            return;
        }

        let corpus = collect_corpus(dir.path(), &CollectConfig::default()).unwrap();
        let paths: Vec<_> = corpus.paths().collect();
        assert_eq!(paths, vec!["ok.py"]);
    }
}
