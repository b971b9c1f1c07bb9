//! Branch and latest-commit metadata.

use std::fmt;
use std::path::Path;

use revstat_core::{GitConfig, RevstatError};
use serde::Serialize;

use crate::runner::{CommandRunner, SystemRunner};

/// Arguments printing the abbreviated name of the current branch.
pub const BRANCH_ARGS: [&str; 3] = ["rev-parse", "--abbrev-ref", "HEAD"];

/// Arguments printing `hash|subject|author` for the most recent commit.
pub const COMMIT_ARGS: [&str; 3] = ["log", "-1", "--pretty=format:%H|%s|%an"];

/// Repository metadata captured at fetch time.
///
/// Empty commit fields mean "unknown": they are left empty when the commit
/// record could not be split into its three parts.
///
/// # Examples
///
/// ```
/// use revstat_gitinfo::info::GitInfo;
///
/// let info = GitInfo {
///     branch: "main".into(),
///     ..GitInfo::default()
/// };
/// assert!(!info.has_commit());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    /// Abbreviated current branch name (`HEAD` when detached).
    pub branch: String,
    /// Full hash of the latest commit.
    pub commit_hash: String,
    /// Subject line of the latest commit.
    pub commit_message: String,
    /// Author name of the latest commit.
    pub author: String,
}

impl GitInfo {
    /// Returns `true` if the commit record was parsed.
    pub fn has_commit(&self) -> bool {
        !self.commit_hash.is_empty()
    }

    /// Render as a Markdown section.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Git Info\n\n");
        out.push_str(&format!("- **Branch:** `{}`\n", or_unknown(&self.branch)));
        out.push_str(&format!("- **Commit:** `{}`\n", or_unknown(&self.commit_hash)));
        out.push_str(&format!("- **Message:** {}\n", or_unknown(&self.commit_message)));
        out.push_str(&format!("- **Author:** {}\n", or_unknown(&self.author)));
        out
    }
}

impl fmt::Display for GitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Git Info")?;
        writeln!(f, "========")?;
        writeln!(f, "{:<8} {}", "Branch", or_unknown(&self.branch))?;
        writeln!(f, "{:<8} {}", "Commit", or_unknown(&self.commit_hash))?;
        writeln!(f, "{:<8} {}", "Message", or_unknown(&self.commit_message))?;
        writeln!(f, "{:<8} {}", "Author", or_unknown(&self.author))
    }
}

fn or_unknown(value: &str) -> &str {
    if value.is_empty() {
        "(unknown)"
    } else {
        value
    }
}

/// Fetches [`GitInfo`] with two sequential queries.
///
/// # Examples
///
/// ```
/// use revstat_core::RevstatError;
/// use revstat_gitinfo::info::{GitInfoFetcher, BRANCH_ARGS};
/// use revstat_gitinfo::runner::CommandRunner;
///
/// struct Canned;
///
/// impl CommandRunner for Canned {
///     fn run(&self, args: &[&str]) -> Result<String, RevstatError> {
///         if args == BRANCH_ARGS {
///             Ok("main\n".into())
///         } else {
///             Ok("abc123|fix: typo|alice".into())
///         }
///     }
/// }
///
/// let info = GitInfoFetcher::new(Canned).fetch().unwrap();
/// assert_eq!(info.branch, "main");
/// assert_eq!(info.author, "alice");
/// ```
#[derive(Debug, Clone)]
pub struct GitInfoFetcher<R> {
    runner: R,
}

impl GitInfoFetcher<SystemRunner> {
    /// Fetcher using the configured executable, optionally inside `repo`.
    pub fn from_config(config: &GitConfig, repo: Option<&Path>) -> Self {
        let mut runner = SystemRunner::from_config(config);
        if let Some(dir) = repo {
            runner = runner.with_current_dir(dir);
        }
        Self::new(runner)
    }
}

impl<R: CommandRunner> GitInfoFetcher<R> {
    /// Fetcher backed by `runner`.
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Query the current branch, then the latest commit.
    ///
    /// # Errors
    ///
    /// Returns [`RevstatError::ExternalProcess`] if either query fails. A
    /// failing branch query stops the fetch before the commit query runs.
    /// A commit record that does not split into exactly three `|`-separated
    /// parts is not an error; the commit fields stay empty.
    pub fn fetch(&self) -> Result<GitInfo, RevstatError> {
        let mut info = GitInfo {
            branch: self.runner.run(&BRANCH_ARGS)?.trim().to_string(),
            ..GitInfo::default()
        };

        let record = self.runner.run(&COMMIT_ARGS)?;
        match parse_commit_record(&record) {
            Some((hash, message, author)) => {
                info.commit_hash = hash.to_string();
                info.commit_message = message.to_string();
                info.author = author.to_string();
            }
            None => {
                tracing::warn!(record = %record, "unexpected commit record shape; commit fields left empty");
            }
        }

        Ok(info)
    }
}

/// Split a `hash|subject|author` record, returning `None` unless it has
/// exactly three parts. A trailing line ending is ignored.
///
/// # Examples
///
/// ```
/// use revstat_gitinfo::info::parse_commit_record;
///
/// assert_eq!(parse_commit_record("abc|msg|bob"), Some(("abc", "msg", "bob")));
/// assert_eq!(parse_commit_record("abc|a|b|bob"), None);
/// ```
pub fn parse_commit_record(record: &str) -> Option<(&str, &str, &str)> {
    let record = record.trim_end_matches(['\r', '\n']);
    let parts: Vec<&str> = record.split('|').collect();
    match parts.as_slice() {
        [hash, message, author] => Some((*hash, *message, *author)),
        _ => None,
    }
}
