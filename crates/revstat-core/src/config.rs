use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RevstatError;

/// Top-level configuration loaded from `.revstat.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// # Examples
///
/// ```
/// use revstat_core::RevstatConfig;
///
/// let config = RevstatConfig::default();
/// assert!(config.review.ignore_patterns.is_empty());
/// assert_eq!(config.git.program, "git");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevstatConfig {
    /// Review statistics settings.
    #[serde(default)]
    pub review: ReviewConfig,
    /// Version-control executable settings.
    #[serde(default)]
    pub git: GitConfig,
}

impl RevstatConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RevstatError::FileNotFound`] if `path` does not exist,
    /// [`RevstatError::Io`] if it cannot be read, or [`RevstatError::Toml`]
    /// if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use revstat_core::RevstatConfig;
    /// use std::path::Path;
    ///
    /// let config = RevstatConfig::from_file(Path::new(".revstat.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, RevstatError> {
        if !path.exists() {
            return Err(RevstatError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Ignore patterns are kept as raw strings here; they are only compiled
    /// when a file name is matched against them.
    ///
    /// # Errors
    ///
    /// Returns [`RevstatError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use revstat_core::RevstatConfig;
    ///
    /// let toml = r#"
    /// [review]
    /// ignore_patterns = ["vendor/*"]
    /// "#;
    /// let config = RevstatConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.review.ignore_patterns, vec!["vendor/*"]);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, RevstatError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Review statistics configuration.
///
/// # Examples
///
/// ```
/// use revstat_core::ReviewConfig;
///
/// let config = ReviewConfig::default();
/// assert_eq!(config.issues_heading, "主要问题");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Glob patterns for changed files that should not be counted.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Heading that marks a main-issues section in the review report.
    #[serde(default = "default_issues_heading")]
    pub issues_heading: String,
}

fn default_issues_heading() -> String {
    "主要问题".into()
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            issues_heading: default_issues_heading(),
        }
    }
}

/// Version-control executable configuration.
///
/// # Examples
///
/// ```
/// use revstat_core::GitConfig;
/// use std::time::Duration;
///
/// let config = GitConfig::default();
/// assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// Executable to invoke (default: `"git"`).
    #[serde(default = "default_program")]
    pub program: String,
    /// Per-invocation timeout in seconds; `0` waits indefinitely (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_program() -> String {
    "git".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl GitConfig {
    /// The invocation timeout, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = RevstatConfig::default();
        assert!(config.review.ignore_patterns.is_empty());
        assert_eq!(config.review.issues_heading, "主要问题");
        assert_eq!(config.git.program, "git");
        assert_eq!(config.git.timeout_secs, 30);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[review]
ignore_patterns = ["vendor/*", "*.pb.go"]
issues_heading = "Main issues"

[git]
program = "/usr/local/bin/git"
timeout_secs = 5
"#;
        let config = RevstatConfig::from_toml(toml).unwrap();
        assert_eq!(config.review.ignore_patterns, vec!["vendor/*", "*.pb.go"]);
        assert_eq!(config.review.issues_heading, "Main issues");
        assert_eq!(config.git.program, "/usr/local/bin/git");
        assert_eq!(config.git.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn malformed_patterns_are_accepted_at_load_time() {
        let toml = r#"
[review]
ignore_patterns = ["[unclosed", "*.go"]
"#;
        let config = RevstatConfig::from_toml(toml).unwrap();
        assert_eq!(config.review.ignore_patterns.len(), 2);
    }

    #[test]
    fn zero_timeout_disables_bound() {
        let config = RevstatConfig::from_toml("[git]\ntimeout_secs = 0\n").unwrap();
        assert_eq!(config.git.timeout(), None);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = RevstatConfig::from_toml("").unwrap();
        assert_eq!(config.git.program, "git");
        assert_eq!(config.review.issues_heading, "主要问题");
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = RevstatConfig::from_toml("{{invalid}}");
        assert!(matches!(result, Err(RevstatError::Toml(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = RevstatConfig::from_file(Path::new("/nonexistent/.revstat.toml"));
        assert!(matches!(result, Err(RevstatError::FileNotFound(_))));
    }
}
