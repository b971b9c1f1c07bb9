use revstat_core::{IssueLevel, ReviewConfig};
use revstat_difflens::analyze::{ReviewStats, StatsAnalyzer};
use revstat_difflens::filter::should_ignore;

fn analyze_with(patterns: &[&str], diff: &str, report: &str) -> ReviewStats {
    let config = ReviewConfig {
        ignore_patterns: patterns.iter().map(|p| p.to_string()).collect(),
        ..ReviewConfig::default()
    };
    StatsAnalyzer::from_config(&config).analyze(diff, report)
}

#[test]
fn added_and_deleted_counts_match_prefixed_lines() {
    let mut diff = String::new();
    for i in 0..7 {
        diff.push_str(&format!("+added {i} --- with noise\n"));
    }
    for i in 0..4 {
        diff.push_str(&format!("-removed {i} +++ noise\n"));
    }
    diff.push_str("+++ b/file\n--- a/file\n context line\n");

    let stats = analyze_with(&[], &diff, "");
    assert_eq!(stats.lines_added, 7);
    assert_eq!(stats.lines_deleted, 4);
}

#[test]
fn files_changed_respects_ignore_patterns() {
    let diff = "diff --git a/foo.go b/foo.go\n\
                +x\n\
                diff --git a/bar.go b/bar.go\n\
                +y\n";

    assert_eq!(analyze_with(&[], diff, "").files_changed, 2);
    assert_eq!(analyze_with(&["foo.go"], diff, "").files_changed, 1);
    assert_eq!(analyze_with(&["*.go"], diff, "").files_changed, 0);
}

#[test]
fn vendored_paths_ignored_by_directory_glob() {
    let diff = "diff --git a/vendor/lib.go b/vendor/lib.go\n\
                +v\n\
                diff --git a/main.go b/main.go\n\
                +m\n";
    let stats = analyze_with(&["vendor/*"], diff, "");
    assert_eq!(stats.files_changed, 1);
    assert!(should_ignore("vendor/lib.go", &["vendor/*"]));
    assert!(!should_ignore("main.go", &["vendor/*"]));
}

#[test]
fn report_severity_and_common_issues() {
    let stats = analyze_with(
        &[],
        "",
        "## 主要问题\n严重\n1. SQL injection risk\n2. missing null check",
    );
    assert_eq!(stats.issues_by_level.get(&IssueLevel::Severe), Some(&1));
    assert_eq!(
        stats.common_issues,
        vec!["SQL injection risk", "missing null check"]
    );
}

#[test]
fn severe_beats_moderate_in_same_section() {
    let stats = analyze_with(&[], "", "## 主要问题\n严重问题一个，中等问题两个\n1. a");
    assert_eq!(stats.issues_at(IssueLevel::Severe), 1);
    assert_eq!(stats.issues_at(IssueLevel::Moderate), 0);
    assert_eq!(stats.issues_at(IssueLevel::Low), 0);
}
