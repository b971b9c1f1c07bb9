//! External process execution.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;

use revstat_core::{GitConfig, RevstatError};
use tokio::process::Command;

/// Runs a fixed program with the given arguments and returns its stdout.
///
/// Implementations must return [`RevstatError::ExternalProcess`] when the
/// program cannot be started or exits unsuccessfully.
pub trait CommandRunner {
    /// Run the program with `args`, returning captured stdout.
    fn run(&self, args: &[&str]) -> Result<String, RevstatError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, args: &[&str]) -> Result<String, RevstatError> {
        (**self).run(args)
    }
}

/// A [`CommandRunner`] that spawns a real process.
///
/// Each call drives the child on a single-threaded tokio runtime, so it
/// must not be called from inside another tokio runtime.
///
/// # Examples
///
/// ```no_run
/// use revstat_gitinfo::runner::{CommandRunner, SystemRunner};
///
/// let git = SystemRunner::new("git").with_current_dir(".");
/// let branch = git.run(&["rev-parse", "--abbrev-ref", "HEAD"]).unwrap();
/// println!("{}", branch.trim());
/// ```
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: String,
    current_dir: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Run `program` in the current directory with no timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current_dir: None,
            envs: Vec::new(),
            timeout: None,
        }
    }

    /// Runner for the configured version-control executable and timeout.
    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(config.program.clone()).with_timeout(config.timeout())
    }

    /// Run the program inside `dir`.
    pub fn with_current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set an environment variable for the child process only.
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Kill the program and fail if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The program this runner invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut parts = vec![self.program.as_str()];
        parts.extend_from_slice(args);
        parts.join(" ")
    }

    async fn output(&self, args: &[&str], display: &str) -> Result<Output, RevstatError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        // Dropping the output future on timeout kills the child.
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| {
                    RevstatError::ExternalProcess(format!(
                        "{display} timed out after {}s",
                        limit.as_secs_f64()
                    ))
                })?,
            None => cmd.output().await,
        };

        output.map_err(|e| RevstatError::ExternalProcess(format!("failed to run {display}: {e}")))
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, args: &[&str]) -> Result<String, RevstatError> {
        let described = self.describe(args);
        tracing::debug!(command = %described, "running external command");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RevstatError::ExternalProcess(format!("starting runtime for {described}: {e}")))?;
        let output = runtime.block_on(self.output(args, &described))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RevstatError::ExternalProcess(format!(
                "{described} failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
