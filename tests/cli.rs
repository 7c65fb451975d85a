use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("policyrev").unwrap()
}

fn write_project(dir: &Path) {
    fs::create_dir_all(dir.join("app")).unwrap();
    fs::write(dir.join("app/m.py"), "def f(): pass\n").unwrap();
    fs::write(dir.join("README.md"), "# demo\n").unwrap();
}

fn write_config(dir: &Path, extra: &str) -> std::path::PathBuf {
    let path = dir.join("policyrev.yaml");
    let yaml = format!(
        "target: '{}'\nlaunch_delay_ms: 0\n{}\npolicies:\n  - name: Separation of Concerns\n    description: Business logic is kept apart from I/O.\n  - name: Testability\n    description: Core logic can be tested without infrastructure.\n",
        dir.join("project").display(),
        extra
    );
    fs::write(&path, yaml).unwrap();
    path
}

#[test]
fn schema_prints_json_schema() {
    cmd()
        .arg("schema")
        .assert()
        .success()
        .stdout(contains("\"title\": \"Config\""))
        .stdout(contains("max_corpus_chars"));
}

#[test]
fn init_writes_starter_config_once() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policyrev.yaml");

    cmd()
        .args(["init", "--path", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("7 starter policies"));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# policyrev configuration"));
    assert!(written.contains("policies:"));

    cmd()
        .args(["init", "--path", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    cmd()
        .args(["init", "--force", "--path", path.to_str().unwrap()])
        .assert()
        .success();
}

#[test]
fn run_with_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["run", "-c"])
        .arg(dir.path().join("absent.yaml"))
        .assert()
        .failure()
        .stderr(contains("Failed to read config file"));
}

#[test]
fn run_rejects_config_without_policies() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("policyrev.yaml");
    fs::write(&path, "concurrency: 2\n").unwrap();

    cmd()
        .args(["run", "--dry-run", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("No policies declared"));
}

#[test]
fn dry_run_prints_plan_without_credentials() {
    let dir = TempDir::new().unwrap();
    write_project(&dir.path().join("project"));
    let config = write_config(dir.path(), "");

    cmd()
        .env_remove("OPENAI_API_KEY")
        .args(["run", "--dry-run", "--concurrency", "3", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("=== Execution Plan ==="))
        .stdout(contains("Concurrency: 3"))
        .stdout(contains("Files: 2"))
        .stdout(contains("  - Separation of Concerns"))
        .stdout(contains("  - Testability"));
}

#[test]
fn dry_run_reports_corpus_truncation() {
    let dir = TempDir::new().unwrap();
    write_project(&dir.path().join("project"));
    let config = write_config(dir.path(), "");

    cmd()
        .args(["run", "--dry-run", "--max-corpus-chars", "20", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("will be truncated to 20 characters"));

    cmd()
        .args(["run", "--dry-run", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("within the 400000 character limit"));
}

#[test]
fn dry_run_warns_when_reject_would_abort() {
    let dir = TempDir::new().unwrap();
    write_project(&dir.path().join("project"));
    let config = write_config(dir.path(), "truncation: reject\nmax_corpus_chars: 20");

    cmd()
        .args(["run", "--dry-run", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("over the 20 character limit; the run will be rejected"));
}

#[test]
fn run_without_api_key_fails_before_review() {
    let dir = TempDir::new().unwrap();
    write_project(&dir.path().join("project"));
    let config = write_config(dir.path(), "");

    cmd()
        .env_remove("OPENAI_API_KEY")
        .args(["run", "-c"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("OPENAI_API_KEY"));
}

#[test]
fn collect_prints_corpus_document() {
    let dir = TempDir::new().unwrap();
    write_project(dir.path());

    cmd()
        .args(["collect", "--target"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("Directory Structure"))
        .stdout(contains("File: app/m.py"))
        .stdout(contains("def f(): pass"));
}

#[test]
fn collect_missing_target_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["collect", "--target"])
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(contains("does not exist"));
}

#[cfg(unix)]
#[test]
fn low_verdicts_still_exit_zero() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write_project(&dir.path().join("project"));

    let fake = dir.path().join("claude");
    fs::write(
        &fake,
        "#!/bin/sh\ncat > /dev/null\nprintf '%s\\n' '{\"type\":\"result\",\"result\":\"{\\\"verdict\\\": 1, \\\"comment\\\": \\\"Handlers call the database directly\\\"}\"}'\n",
    )
    .unwrap();
    fs::set_permissions(&fake, fs::Permissions::from_mode(0o755)).unwrap();

    let config = write_config(
        dir.path(),
        &format!(
            "provider: claude_cli\nproviders:\n  claude_cli:\n    binary: '{}'",
            fake.display()
        ),
    );
    let reports = dir.path().join("reports");

    cmd()
        .args(["run", "--format", "github", "-c"])
        .arg(&config)
        .arg("--report-dir")
        .arg(&reports)
        .assert()
        .success()
        .stdout(contains("::warning title=policyrev%3A Separation of Concerns::"))
        .stdout(contains("scored 1/5"))
        .stdout(predicate::str::contains("::warning").count(2));

    let dated: Vec<_> = fs::read_dir(&reports).unwrap().collect();
    assert_eq!(dated.len(), 1);
    let dated = dated[0].as_ref().unwrap().path();
    assert!(dated.join("policy-review.md").exists());
    assert!(dated.join("policy-review.json").exists());
}
