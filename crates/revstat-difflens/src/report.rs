//! Extraction of severity counts and recurring issues from review reports.
//!
//! The review generator emits Markdown-ish text with `##` headings. The
//! section headed "主要问题" (main issues) carries a severity marker and a
//! short numbered list. Matching is done on literal text, so it is isolated
//! behind [`ReportParser`] and can be swapped for a structured format.

use std::collections::BTreeMap;

use revstat_core::IssueLevel;
use serde::Serialize;

const SECTION_MARKER: &str = "##";
const ISSUE_ENUMERATORS: [&str; 2] = ["1.", "2."];

/// What a report parser extracts from a review report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFindings {
    /// Number of main-issues sections credited to each level.
    pub issues_by_level: BTreeMap<IssueLevel, usize>,
    /// Numbered issue descriptions, in report order.
    pub common_issues: Vec<String>,
}

/// Turns review report text into [`ReportFindings`].
pub trait ReportParser {
    /// Parse `report`. Parsing never fails; unrecognized text yields
    /// empty findings.
    fn parse(&self, report: &str) -> ReportFindings;
}

/// Heading-based parser for the review generator's default report layout.
///
/// Splits the report on `##`, and for every section whose trimmed text
/// starts with the configured heading:
/// - credits at most one [`IssueLevel`], the first of severe, moderate,
///   low whose marker appears anywhere in the section;
/// - collects lines starting with `1.` or `2.` as common issues.
///
/// # Examples
///
/// ```
/// use revstat_core::IssueLevel;
/// use revstat_difflens::report::{HeadingReportParser, ReportParser};
///
/// let report = "## 主要问题\n严重\n1. SQL injection risk\n2. missing null check";
/// let findings = HeadingReportParser::default().parse(report);
/// assert_eq!(findings.issues_by_level[&IssueLevel::Severe], 1);
/// assert_eq!(findings.common_issues, vec!["SQL injection risk", "missing null check"]);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingReportParser {
    heading: String,
}

impl HeadingReportParser {
    /// Create a parser that looks for sections starting with `heading`.
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
        }
    }

    /// The heading this parser matches.
    pub fn heading(&self) -> &str {
        &self.heading
    }
}

impl Default for HeadingReportParser {
    fn default() -> Self {
        Self::new("主要问题")
    }
}

impl ReportParser for HeadingReportParser {
    fn parse(&self, report: &str) -> ReportFindings {
        let mut findings = ReportFindings::default();

        for section in report.split(SECTION_MARKER) {
            let section = section.trim();
            if !section.starts_with(self.heading.as_str()) {
                continue;
            }

            match detect_level(section) {
                Some(level) => {
                    *findings.issues_by_level.entry(level).or_insert(0) += 1;
                    tracing::debug!(level = level.english(), "credited issues section");
                }
                None => tracing::debug!("issues section without a severity marker"),
            }

            findings.common_issues.extend(numbered_items(section));
        }

        findings
    }
}

/// First level, in priority order, whose marker occurs in `section`.
///
/// # Examples
///
/// ```
/// use revstat_core::IssueLevel;
/// use revstat_difflens::report::detect_level;
///
/// assert_eq!(detect_level("中等 and 严重"), Some(IssueLevel::Severe));
/// assert_eq!(detect_level("nothing here"), None);
/// ```
pub fn detect_level(section: &str) -> Option<IssueLevel> {
    IssueLevel::ALL
        .into_iter()
        .find(|level| section.contains(level.label()))
}

/// Items from lines beginning with `1.` or `2.`, enumerator and
/// surrounding whitespace removed. Empty items are dropped.
fn numbered_items(section: &str) -> impl Iterator<Item = String> + '_ {
    section
        .lines()
        .filter(|line| ISSUE_ENUMERATORS.iter().any(|e| line.starts_with(e)))
        .filter_map(|line| {
            let mut item = line;
            for enumerator in ISSUE_ENUMERATORS {
                item = item.strip_prefix(enumerator).unwrap_or(item).trim();
            }
            (!item.is_empty()).then(|| item.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(report: &str) -> ReportFindings {
        HeadingReportParser::default().parse(report)
    }

    #[test]
    fn severe_section_with_two_items() {
        let findings = parse("## 主要问题\n严重\n1. SQL injection risk\n2. missing null check");
        assert_eq!(findings.issues_by_level.get(&IssueLevel::Severe), Some(&1));
        assert_eq!(findings.issues_by_level.len(), 1);
        assert_eq!(
            findings.common_issues,
            vec!["SQL injection risk", "missing null check"]
        );
    }

    #[test]
    fn first_match_wins_across_levels() {
        let findings = parse("## 主要问题\n中等: x\n严重: y\n低: z");
        assert_eq!(findings.issues_by_level.get(&IssueLevel::Severe), Some(&1));
        assert!(!findings.issues_by_level.contains_key(&IssueLevel::Moderate));
        assert!(!findings.issues_by_level.contains_key(&IssueLevel::Low));
    }

    #[test]
    fn moderate_then_low_priority() {
        assert_eq!(
            parse("## 主要问题\n低 中等").issues_by_level.get(&IssueLevel::Moderate),
            Some(&1)
        );
        assert_eq!(
            parse("## 主要问题\n低").issues_by_level.get(&IssueLevel::Low),
            Some(&1)
        );
    }

    #[test]
    fn counts_per_section_not_per_issue() {
        let report = "## 主要问题\n严重\n1. a\n2. b\n## 主要问题 (续)\n严重 严重\n1. c";
        let findings = parse(report);
        assert_eq!(findings.issues_by_level.get(&IssueLevel::Severe), Some(&2));
        assert_eq!(findings.common_issues, vec!["a", "b", "c"]);
    }

    #[test]
    fn other_sections_ignored() {
        let report = "## 概述\n严重\n1. not an issue\n## 建议\n2. also not";
        assert_eq!(parse(report), ReportFindings::default());
    }

    #[test]
    fn only_first_two_enumerators_recognized() {
        let report = "## 主要问题\n1. one\n2. two\n3. three\n- dash\n10. ten";
        let findings = parse(report);
        assert_eq!(findings.common_issues, vec!["one", "two"]);
    }

    #[test]
    fn indented_enumerators_not_recognized() {
        let findings = parse("## 主要问题\n  1. indented\n1.flush");
        assert_eq!(findings.common_issues, vec!["flush"]);
    }

    #[test]
    fn empty_items_dropped() {
        let findings = parse("## 主要问题\n1.\n2.   \n1. 2. nested");
        assert_eq!(findings.common_issues, vec!["nested"]);
    }

    #[test]
    fn section_without_level_still_collects_items() {
        let findings = parse("## 主要问题\n1. something");
        assert!(findings.issues_by_level.is_empty());
        assert_eq!(findings.common_issues, vec!["something"]);
    }

    #[test]
    fn custom_heading() {
        let parser = HeadingReportParser::new("Main issues");
        let findings = parser.parse("## Main issues\n严重\n1. leak");
        assert_eq!(parser.heading(), "Main issues");
        assert_eq!(findings.issues_by_level.get(&IssueLevel::Severe), Some(&1));
        assert_eq!(findings.common_issues, vec!["leak"]);
    }

    #[test]
    fn empty_report() {
        assert_eq!(parse(""), ReportFindings::default());
    }
}
