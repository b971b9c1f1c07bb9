use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use serde::Serialize;
use tracing::Level;

use revstat_core::{OutputFormat, RevstatConfig};
use revstat_difflens::analyze::{ReviewStats, StatsAnalyzer};
use revstat_difflens::filter::IgnoreFilter;
use revstat_gitinfo::info::{GitInfo, GitInfoFetcher};

const CONFIG_FILE: &str = ".revstat.toml";

#[derive(Parser)]
#[command(
    name = "revstat",
    version,
    about = "Review statistics for AI code review runs",
    long_about = "Summarize an AI code review run: diff line counts, changed files,\n\
                   issue severities from the review report, and git metadata.\n\n\
                   Examples:\n  \
                     git diff | revstat stats --report review.md     Stats for a diff on stdin\n  \
                     revstat stats --diff a.patch --report r.md --git  Include branch and commit\n  \
                     revstat git-info                                 Current branch and latest commit\n  \
                     revstat check-ignore vendor/lib.go src/main.go   Test ignore patterns"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .revstat.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable tables and summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose (debug) logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Compute statistics for a diff and its review report
    #[command(long_about = "Compute statistics for a diff and its review report.\n\n\
        Counts added/deleted lines and changed files in a unified diff, skipping\n\
        files that match the configured ignore patterns, and extracts issue\n\
        severities and numbered issues from the report's main-issues section.\n\n\
        Examples:\n  git diff | revstat stats --report review.md\n  revstat stats --diff changes.patch --report review.md --git")]
    Stats {
        /// Read diff from file instead of stdin
        #[arg(long)]
        diff: Option<PathBuf>,
        /// Review report produced for the diff
        #[arg(long)]
        report: PathBuf,
        /// Also fetch branch and latest commit
        #[arg(long)]
        git: bool,
        /// Repository to query for git metadata (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
        /// Additional glob patterns for files to ignore (e.g. "vendor/*")
        #[arg(long)]
        ignore: Vec<String>,
    },
    /// Show the current branch and latest commit
    GitInfo {
        /// Repository to query (default: current directory)
        #[arg(long)]
        repo: Option<PathBuf>,
    },
    /// Check which paths the ignore patterns exclude
    CheckIgnore {
        /// Paths to test, as they appear in diff headers
        #[arg(required = true)]
        paths: Vec<String>,
        /// Additional glob patterns for files to ignore
        #[arg(long)]
        ignore: Vec<String>,
    },
    /// Create a default .revstat.toml configuration file
    #[command(long_about = "Create a default .revstat.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .revstat.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Statistics plus optional git metadata, as rendered by `revstat stats`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewSummary {
    stats: ReviewStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    git: Option<GitInfo>,
}

#[derive(Serialize)]
struct IgnoreCheck {
    path: String,
    ignored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
}

const DEFAULT_CONFIG: &str = r#"# revstat configuration

[review]
# Changed files matching these globs are not counted in files_changed.
# `*` and `?` do not cross `/`, `[^...]` negates a class, `\` escapes.
# Malformed patterns are skipped.
# ignore_patterns = ["vendor/*", "*.pb.go", "go.sum"]

# Heading of the report section that lists the main issues.
# issues_heading = "主要问题"

[git]
# program = "git"
# Seconds before a git invocation is killed (0 = wait forever).
# timeout_secs = 30
"#;

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("revstat v{version}: review statistics for AI code review runs\n");

    println!("Quick start:");
    println!("  revstat init                                 Create a .revstat.toml config file");
    println!("  git diff | revstat stats --report review.md  Summarize a review run\n");

    println!("All commands:");
    println!("  stats         Diff counts and report findings");
    println!("  git-info      Current branch and latest commit");
    println!("  check-ignore  Test paths against ignore patterns");
    println!("  init          Create default configuration\n");

    println!("Run 'revstat <command> --help' for details.");
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<RevstatConfig> {
    let config = match path {
        Some(path) => RevstatConfig::from_file(path)?,
        None => {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                RevstatConfig::from_file(default_path)?
            } else {
                RevstatConfig::default()
            }
        }
    };
    Ok(config)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err(format!("reading {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            Ok(input)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}

fn render_summary(summary: &ReviewSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(summary)?,
        OutputFormat::Markdown => {
            print!("{}", summary.stats.to_markdown());
            if let Some(git) = &summary.git {
                print!("\n{}", git.to_markdown());
            }
        }
        OutputFormat::Text => {
            print!("{}", summary.stats);
            if let Some(git) = &summary.git {
                print!("\n{git}");
            }
        }
    }
    Ok(())
}

fn render_ignore_checks(checks: &[IgnoreCheck], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&checks)?,
        OutputFormat::Markdown => {
            println!("| Path | Ignored | Pattern |");
            println!("|------|---------|---------|");
            for check in checks {
                println!(
                    "| {} | {} | {} |",
                    check.path,
                    if check.ignored { "yes" } else { "no" },
                    check.pattern.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Text => {
            for check in checks {
                match &check.pattern {
                    Some(pattern) => println!("ignored  {}  ({pattern})", check.path),
                    None => println!("kept     {}", check.path),
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;
    tracing::debug!(
        format = %cli.format,
        ignore_patterns = config.review.ignore_patterns.len(),
        "configuration loaded"
    );

    match cli.command {
        None => print_welcome(),
        Some(Command::Stats {
            ref diff,
            ref report,
            git,
            ref repo,
            ref ignore,
        }) => {
            config.review.ignore_patterns.extend(ignore.iter().cloned());

            let diff_input = read_input(diff.as_deref())?;
            let report_input = read_input(Some(report.as_path()))?;
            if diff_input.trim().is_empty() {
                tracing::warn!("diff input is empty");
            }

            let stats =
                StatsAnalyzer::from_config(&config.review).analyze(&diff_input, &report_input);
            let git = if git {
                let fetcher = GitInfoFetcher::from_config(&config.git, repo.as_deref());
                Some(fetcher.fetch().wrap_err("fetching git info")?)
            } else {
                None
            };

            render_summary(&ReviewSummary { stats, git }, cli.format)?;
        }
        Some(Command::GitInfo { ref repo }) => {
            let info = GitInfoFetcher::from_config(&config.git, repo.as_deref())
                .fetch()
                .wrap_err("fetching git info")?;
            match cli.format {
                OutputFormat::Json => print_json(&info)?,
                OutputFormat::Markdown => print!("{}", info.to_markdown()),
                OutputFormat::Text => print!("{info}"),
            }
        }
        Some(Command::CheckIgnore {
            ref paths,
            ref ignore,
        }) => {
            config.review.ignore_patterns.extend(ignore.iter().cloned());
            let filter = IgnoreFilter::from_config(&config.review);

            let checks: Vec<IgnoreCheck> = paths
                .iter()
                .map(|path| {
                    let pattern = filter.matching_pattern(path).map(str::to_string);
                    IgnoreCheck {
                        path: path.clone(),
                        ignored: pattern.is_some(),
                        pattern,
                    }
                })
                .collect();
            render_ignore_checks(&checks, cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(CONFIG_FILE);
            if path.exists() {
                miette::bail!("{CONFIG_FILE} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {CONFIG_FILE} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "revstat", &mut std::io::stdout());
        }
    }

    Ok(())
}
