use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Severity level detected in a review report's main-issues section.
///
/// Levels are recognized by the literal marker text the review generator
/// writes, not by structured tags. Serialized as that marker text.
///
/// # Examples
///
/// ```
/// use revstat_core::IssueLevel;
///
/// assert_eq!(IssueLevel::Severe.label(), "严重");
/// let json = serde_json::to_string(&IssueLevel::Moderate).unwrap();
/// assert_eq!(json, "\"中等\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IssueLevel {
    /// Severe ("严重").
    #[serde(rename = "严重")]
    Severe,
    /// Moderate ("中等").
    #[serde(rename = "中等")]
    Moderate,
    /// Low ("低").
    #[serde(rename = "低")]
    Low,
}

impl IssueLevel {
    /// All levels in detection priority order (first match wins).
    pub const ALL: [IssueLevel; 3] = [IssueLevel::Severe, IssueLevel::Moderate, IssueLevel::Low];

    /// The marker text searched for in report sections.
    pub fn label(self) -> &'static str {
        match self {
            IssueLevel::Severe => "严重",
            IssueLevel::Moderate => "中等",
            IssueLevel::Low => "低",
        }
    }

    /// English name, used in human-readable output.
    pub fn english(self) -> &'static str {
        match self {
            IssueLevel::Severe => "severe",
            IssueLevel::Moderate => "moderate",
            IssueLevel::Low => "low",
        }
    }
}

impl fmt::Display for IssueLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use revstat_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and summaries.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown-formatted output.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
