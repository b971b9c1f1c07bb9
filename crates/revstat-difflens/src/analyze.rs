//! Review statistics: diff counts plus report findings in one record.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use revstat_core::{IssueLevel, ReviewConfig};
use serde::Serialize;

use crate::filter::IgnoreFilter;
use crate::report::{HeadingReportParser, ReportParser};
use crate::stats::scan_diff;

/// Aggregate statistics for one review.
///
/// Every count comes from a single scan of the diff and report text; the
/// record is built fresh per [`StatsAnalyzer::analyze`] call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Added lines across all files, ignored files included.
    pub lines_added: usize,
    /// Deleted lines across all files, ignored files included.
    pub lines_deleted: usize,
    /// Distinct changed files not matched by an ignore pattern.
    pub files_changed: usize,
    /// Main-issues sections credited to each severity level.
    pub issues_by_level: BTreeMap<IssueLevel, usize>,
    /// Numbered issue descriptions in report order.
    pub common_issues: Vec<String>,
    /// When the analysis started.
    pub review_date_time: DateTime<Utc>,
}

impl ReviewStats {
    /// Sections credited to `level`, zero if none.
    ///
    /// # Examples
    ///
    /// ```
    /// use revstat_core::IssueLevel;
    /// use revstat_difflens::analyze::StatsAnalyzer;
    ///
    /// let analyzer: StatsAnalyzer = StatsAnalyzer::default();
    /// let stats = analyzer.analyze("", "## 主要问题\n低");
    /// assert_eq!(stats.issues_at(IssueLevel::Low), 1);
    /// assert_eq!(stats.issues_at(IssueLevel::Severe), 0);
    /// ```
    pub fn issues_at(&self, level: IssueLevel) -> usize {
        self.issues_by_level.get(&level).copied().unwrap_or(0)
    }

    /// Render as a Markdown section.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Review Statistics\n\n");
        out.push_str(&format!(
            "**Reviewed:** {}\n\n",
            self.review_date_time.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str("| Metric | Value |\n");
        out.push_str("|--------|-------|\n");
        out.push_str(&format!("| Files changed | {} |\n", self.files_changed));
        out.push_str(&format!("| Lines added | +{} |\n", self.lines_added));
        out.push_str(&format!("| Lines deleted | -{} |\n", self.lines_deleted));
        for level in IssueLevel::ALL {
            out.push_str(&format!(
                "| Issues ({}) | {} |\n",
                level.label(),
                self.issues_at(level)
            ));
        }

        if !self.common_issues.is_empty() {
            out.push_str("\n## Common Issues\n\n");
            for (i, issue) in self.common_issues.iter().enumerate() {
                out.push_str(&format!("{}. {issue}\n", i + 1));
            }
        }
        out
    }
}

impl fmt::Display for ReviewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Review Statistics")?;
        writeln!(f, "=================")?;
        writeln!(
            f,
            "Reviewed: {}\n",
            self.review_date_time.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(f, "{:<16} {:>8}", "Files changed", self.files_changed)?;
        writeln!(f, "{:<16} {:>8}", "Lines added", format!("+{}", self.lines_added))?;
        writeln!(f, "{:<16} {:>8}", "Lines deleted", format!("-{}", self.lines_deleted))?;

        writeln!(f, "\nIssues by level:")?;
        for level in IssueLevel::ALL {
            writeln!(
                f,
                "  {:<10} {:>4}",
                format!("{} ({})", level.label(), level.english()),
                self.issues_at(level)
            )?;
        }

        if !self.common_issues.is_empty() {
            writeln!(f, "\nCommon issues:")?;
            for (i, issue) in self.common_issues.iter().enumerate() {
                writeln!(f, "  {}. {issue}", i + 1)?;
            }
        }
        Ok(())
    }
}

/// Combines the diff scan and a [`ReportParser`] into [`ReviewStats`].
///
/// # Examples
///
/// ```
/// use revstat_core::ReviewConfig;
/// use revstat_difflens::analyze::StatsAnalyzer;
///
/// let config = ReviewConfig {
///     ignore_patterns: vec!["foo.go".into()],
///     ..ReviewConfig::default()
/// };
/// let diff = "diff --git a/foo.go b/foo.go\n+a\ndiff --git a/bar.go b/bar.go\n-b\n";
/// let stats = StatsAnalyzer::from_config(&config).analyze(diff, "");
/// assert_eq!(stats.files_changed, 1);
/// assert_eq!(stats.lines_added, 1);
/// assert_eq!(stats.lines_deleted, 1);
/// ```
#[derive(Debug, Clone)]
pub struct StatsAnalyzer<P = HeadingReportParser> {
    filter: IgnoreFilter,
    parser: P,
}

impl StatsAnalyzer<HeadingReportParser> {
    /// Build an analyzer from the review configuration's ignore patterns
    /// and issues heading.
    pub fn from_config(config: &ReviewConfig) -> Self {
        Self {
            filter: IgnoreFilter::from_config(config),
            parser: HeadingReportParser::new(config.issues_heading.clone()),
        }
    }
}

impl Default for StatsAnalyzer {
    fn default() -> Self {
        Self::from_config(&ReviewConfig::default())
    }
}

impl<P: ReportParser> StatsAnalyzer<P> {
    /// Build an analyzer from an explicit filter and report parser.
    pub fn new(filter: IgnoreFilter, parser: P) -> Self {
        Self { filter, parser }
    }

    /// The ignore filter applied to changed file paths.
    pub fn filter(&self) -> &IgnoreFilter {
        &self.filter
    }

    /// Analyze a unified diff and the review report generated for it.
    ///
    /// Never fails: malformed input simply yields smaller counts. For that
    /// reason this returns [`ReviewStats`] directly instead of a `Result`
    /// with an error that could never be produced.
    pub fn analyze(&self, diff: &str, report: &str) -> ReviewStats {
        let review_date_time = Utc::now();

        let counts = scan_diff(diff, &self.filter);
        let findings = self.parser.parse(report);

        tracing::debug!(
            files = counts.files_changed(),
            added = counts.lines_added,
            deleted = counts.lines_deleted,
            issues = findings.common_issues.len(),
            "analyzed review"
        );

        ReviewStats {
            lines_added: counts.lines_added,
            lines_deleted: counts.lines_deleted,
            files_changed: counts.files_changed(),
            issues_by_level: findings.issues_by_level,
            common_issues: findings.common_issues,
            review_date_time,
        }
    }
}
