use std::path::Path;
use std::process::Command;

use revstat_core::{GitConfig, RevstatError};
use revstat_gitinfo::info::GitInfoFetcher;
use revstat_gitinfo::runner::SystemRunner;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test Author", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {args:?} failed");
}

#[test]
fn fetches_branch_and_latest_commit() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/review-branch"]);
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    git(dir.path(), &["add", "a.txt"]);
    git(dir.path(), &["commit", "-q", "-m", "Add greeting"]);

    let info = GitInfoFetcher::from_config(&GitConfig::default(), Some(dir.path()))
        .fetch()
        .unwrap();
    assert_eq!(info.branch, "review-branch");
    assert_eq!(info.commit_hash.len(), 40);
    assert_eq!(info.commit_message, "Add greeting");
    assert_eq!(info.author, "Test Author");
}

#[test]
fn outside_a_repository_fails() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    // Stop git from discovering a repository above the temp dir.
    let runner = SystemRunner::new("git")
        .with_current_dir(dir.path())
        .with_env("GIT_CEILING_DIRECTORIES", dir.path().parent().unwrap());
    let result = GitInfoFetcher::new(runner).fetch();
    assert!(matches!(result, Err(RevstatError::ExternalProcess(_))));
}

#[test]
fn missing_executable_fails() {
    let config = GitConfig {
        program: "revstat-no-such-git".into(),
        timeout_secs: 5,
    };
    let result = GitInfoFetcher::from_config(&config, None).fetch();
    assert!(matches!(result, Err(RevstatError::ExternalProcess(_))));
}
