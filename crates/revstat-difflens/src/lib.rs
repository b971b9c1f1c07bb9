//! Diff statistics, review-report parsing, and ignore-pattern filtering.
//!
//! Scans unified diffs for added/deleted lines and changed files, pulls
//! severity counts and numbered issues out of the review report, and
//! combines both into a [`analyze::ReviewStats`] record.

pub mod analyze;
pub mod filter;
pub mod report;
pub mod stats;
