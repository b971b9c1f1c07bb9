//! Line-prefix scan over unified diff text.
//!
//! This is not a diff parser: hunk headers are not interpreted and
//! malformed input never errors. Counts reflect whichever line prefixes
//! matched.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::filter::IgnoreFilter;

const FILE_HEADER: &str = "diff --git ";

/// Counts gathered from a single pass over a diff.
///
/// # Examples
///
/// ```
/// use revstat_difflens::filter::IgnoreFilter;
/// use revstat_difflens::stats::scan_diff;
///
/// let diff = "diff --git a/src/lib.rs b/src/lib.rs\n\
///             --- a/src/lib.rs\n\
///             +++ b/src/lib.rs\n\
///             @@ -1,2 +1,2 @@\n\
///             -old\n\
///             +new\n";
/// let counts = scan_diff(diff, &IgnoreFilter::default());
/// assert_eq!(counts.lines_added, 1);
/// assert_eq!(counts.lines_deleted, 1);
/// assert_eq!(counts.files_changed(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffCounts {
    /// Lines starting with `+` but not `+++`.
    pub lines_added: usize,
    /// Lines starting with `-` but not `---`.
    pub lines_deleted: usize,
    /// Distinct changed paths that were not ignored.
    pub changed_files: BTreeSet<String>,
}

impl DiffCounts {
    /// Number of distinct, non-ignored changed files.
    pub fn files_changed(&self) -> usize {
        self.changed_files.len()
    }
}

/// Scan `diff` line by line, counting added and deleted lines and
/// collecting changed file paths not matched by `filter`.
pub fn scan_diff(diff: &str, filter: &IgnoreFilter) -> DiffCounts {
    let mut counts = DiffCounts::default();

    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix(FILE_HEADER) {
            let Some(path) = new_side_path(rest) else {
                tracing::debug!(line, "file header without a target path");
                continue;
            };
            if let Some(pattern) = filter.matching_pattern(path) {
                tracing::debug!(path, pattern, "ignoring changed file");
            } else {
                counts.changed_files.insert(path.to_string());
            }
        } else if line.starts_with('+') && !line.starts_with("+++") {
            counts.lines_added += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            counts.lines_deleted += 1;
        }
    }

    counts
}

/// Extract the target path from the remainder of a `diff --git` header:
/// the second whitespace-separated token with any `b/` prefix removed.
///
/// # Examples
///
/// ```
/// use revstat_difflens::stats::new_side_path;
///
/// assert_eq!(new_side_path("a/foo.go b/foo.go"), Some("foo.go"));
/// assert_eq!(new_side_path("a/foo.go"), None);
/// ```
pub fn new_side_path(header_rest: &str) -> Option<&str> {
    let token = header_rest.split_whitespace().nth(1)?;
    Some(token.strip_prefix("b/").unwrap_or(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_file_diff() -> &'static str {
        "diff --git a/foo.go b/foo.go\n\
         --- a/foo.go\n\
         +++ b/foo.go\n\
         @@ -1,3 +1,3 @@\n\
         -x := 1\n\
         +x := 2\n\
         diff --git a/bar.go b/bar.go\n\
         --- a/bar.go\n\
         +++ b/bar.go\n\
         @@ -1,1 +1,2 @@\n\
         +y := 3\n"
    }

    #[test]
    fn counts_prefixed_lines_regardless_of_content() {
        let diff = "+a\n+\n+ + +\n-b\n-\n";
        let counts = scan_diff(diff, &IgnoreFilter::default());
        assert_eq!(counts.lines_added, 3);
        assert_eq!(counts.lines_deleted, 2);
        assert_eq!(counts.files_changed(), 0);
    }

    #[test]
    fn file_markers_are_not_counted() {
        let diff = "+++ b/x\n--- a/x\n++++ still a marker\n---- also\n";
        let counts = scan_diff(diff, &IgnoreFilter::default());
        assert_eq!(counts.lines_added, 0);
        assert_eq!(counts.lines_deleted, 0);
    }

    #[test]
    fn two_headers_two_files() {
        let counts = scan_diff(two_file_diff(), &IgnoreFilter::default());
        assert_eq!(counts.files_changed(), 2);
        assert_eq!(counts.lines_added, 2);
        assert_eq!(counts.lines_deleted, 1);
        assert!(counts.changed_files.contains("foo.go"));
        assert!(counts.changed_files.contains("bar.go"));
    }

    #[test]
    fn ignored_file_not_counted_but_lines_are() {
        let filter = IgnoreFilter::new(&["foo.go"]);
        let counts = scan_diff(two_file_diff(), &filter);
        assert_eq!(counts.files_changed(), 1);
        assert!(!counts.changed_files.contains("foo.go"));
        assert_eq!(counts.lines_added, 2);
    }

    #[test]
    fn repeated_header_is_deduplicated() {
        let diff = "diff --git a/a.rs b/a.rs\n+1\ndiff --git a/a.rs b/a.rs\n+2\n";
        let counts = scan_diff(diff, &IgnoreFilter::default());
        assert_eq!(counts.files_changed(), 1);
        assert_eq!(counts.lines_added, 2);
    }

    #[test]
    fn header_without_target_contributes_no_file() {
        let counts = scan_diff("diff --git a/only\n", &IgnoreFilter::default());
        assert_eq!(counts.files_changed(), 0);
    }

    #[test]
    fn path_without_b_prefix_kept_verbatim() {
        assert_eq!(new_side_path("x/one.rs y/one.rs"), Some("y/one.rs"));
        assert_eq!(new_side_path("a/dir/b/f.rs b/dir/b/f.rs"), Some("dir/b/f.rs"));
    }

    #[test]
    fn empty_and_garbage_input() {
        assert_eq!(scan_diff("", &IgnoreFilter::default()), DiffCounts::default());
        let counts = scan_diff("not a diff\n@@ nonsense @@\n", &IgnoreFilter::default());
        assert_eq!(counts, DiffCounts::default());
    }

    #[test]
    fn crlf_lines_still_counted() {
        let counts = scan_diff("+a\r\n-b\r\n", &IgnoreFilter::default());
        assert_eq!(counts.lines_added, 1);
        assert_eq!(counts.lines_deleted, 1);
    }
}
