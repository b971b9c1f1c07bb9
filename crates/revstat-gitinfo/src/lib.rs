//! Git metadata for review reports: current branch and latest commit.
//!
//! Queries the `git` executable through the [`runner::CommandRunner`]
//! capability so tests can substitute a fake process runner.

pub mod info;
pub mod runner;
