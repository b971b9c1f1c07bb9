use std::path::PathBuf;

/// Errors that can occur across revstat.
///
/// Library crates return this type directly; it also implements
/// [`miette::Diagnostic`] so the binary can propagate it with `?`.
///
/// # Examples
///
/// ```
/// use revstat_core::RevstatError;
///
/// let err = RevstatError::ExternalProcess("git exited with status 128".into());
/// assert!(err.to_string().contains("status 128"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum RevstatError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An external command could not be spawned, exited non-zero, or timed out.
    #[error("external process error: {0}")]
    #[diagnostic(help("check that git is installed and the directory is a git repository"))]
    ExternalProcess(String),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
