//! Core types, configuration, and error handling for revstat.
//!
//! This crate provides the shared foundation used by the other revstat crates:
//! - [`RevstatError`]: unified error type using `thiserror`
//! - [`RevstatConfig`]: configuration loaded from `.revstat.toml`
//! - Shared types: [`IssueLevel`], [`OutputFormat`]

mod config;
mod error;
mod types;

pub use config::{GitConfig, ReviewConfig, RevstatConfig};
pub use error::RevstatError;
pub use types::{IssueLevel, OutputFormat};

/// A convenience `Result` type for revstat operations.
pub type Result<T> = std::result::Result<T, RevstatError>;
