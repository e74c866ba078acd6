//! difflint - lint only what a commit range touched
//!
//! The `difflint` command inspects the last `depth` commits of a monorepo,
//! classifies every changed top-level project by its lint tool and runtime,
//! and either lints them concurrently or prints deploy hints.
//!
//! ## Usage
//!
//! - `difflint`: lint projects changed by the last commit
//! - `difflint 3`: lint projects changed by the last three commits
//! - `difflint 1 deploy`: print deploy hints instead of linting

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use difflint_ci::{
    project_list_json, render_lint_report, DeployConfig, EnvSnapshot, LintCommand, LintConfig,
    LintSession, LintSummary, RunOptions, DEFAULT_TIMEOUT_SECS,
};
use difflint_core::{
    emit_run_finished, emit_run_started, init_tracing, DiffRange, LintTool, PoolConfig, RunSpan,
};

#[derive(Parser, Debug)]
#[command(name = "difflint")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint the monorepo projects changed by recent commits", long_about = None)]
struct Cli {
    /// Number of commits to look back (HEAD~depth..HEAD)
    #[arg(default_value = "1", value_parser = parse_depth)]
    depth: DiffRange,

    /// Any non-empty value prints deploy hints instead of linting
    deploy: Option<String>,

    /// Directory the repository root is resolved from (default: current directory)
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Maximum number of lint processes running at once (default: core count)
    #[arg(long, env = "DIFFLINT_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Per-project lint timeout in seconds; 0 disables it
    #[arg(long, env = "DIFFLINT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Project aliases never listed in deploy hints
    #[arg(
        long,
        env = "DIFFLINT_DEPLOY_IGNORE",
        value_delimiter = ',',
        default_value = "worker,test"
    )]
    deploy_ignore: Vec<String>,

    /// Command run for jshint projects (default: "gulp jshint")
    #[arg(long)]
    jshint_cmd: Option<String>,

    /// Command run for eslint projects, inside `server/` (default: "gulp lint")
    #[arg(long)]
    eslint_cmd: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Disable colored output (also honoured via NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

fn parse_depth(raw: &str) -> std::result::Result<DiffRange, String> {
    DiffRange::parse(raw).map_err(|e| e.to_string())
}

impl Cli {
    fn deploy_mode(&self) -> bool {
        self.deploy.as_deref().is_some_and(|v| !v.is_empty())
    }

    fn color(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
    }

    fn lint_config(&self) -> Result<LintConfig> {
        let mut config = LintConfig::default().with_timeout(self.timeout_secs);
        if let Some(line) = &self.jshint_cmd {
            config.jshint = LintCommand::parse(LintTool::JsHint, line)
                .ok_or_else(|| anyhow!("--jshint-cmd must not be empty"))?;
        }
        if let Some(line) = &self.eslint_cmd {
            config.eslint = LintCommand::parse(LintTool::EsLint, line)
                .ok_or_else(|| anyhow!("--eslint-cmd must not be empty"))?;
        }
        if !self.color() {
            config = config.without_color();
        }
        Ok(config)
    }

    fn run_options(&self) -> Result<RunOptions> {
        let working_dir = match &self.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("Failed to read current directory")?,
        };

        let mut options = RunOptions::new(working_dir);
        options.range = self.depth;
        options.deploy = self.deploy_mode();
        if let Some(n) = self.concurrency {
            options.pool = PoolConfig::new(n);
        }
        options.lint = self.lint_config()?;
        options.deploy_config = DeployConfig::with_ignore(
            self.deploy_ignore
                .iter()
                .map(|alias| alias.trim())
                .filter(|alias| !alias.is_empty()),
        );
        options.progress = !self.no_progress;
        Ok(options)
    }
}

/// Every project linted cleanly or only produced warnings.
const EXIT_OK: u8 = 0;

/// At least one project ended with an Error outcome.
const EXIT_LINT_FAILED: u8 = 1;

/// The run aborted before producing a result.
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let result = run(&cli, &mut std::io::stdout()).await;
    ExitCode::from(exit_status(result))
}

/// Process exit status for a finished lint run.
fn exit_code(summary: &LintSummary) -> u8 {
    if summary.has_failures() {
        EXIT_LINT_FAILED
    } else {
        EXIT_OK
    }
}

/// Map the outcome of [`run`] to a process exit status, logging top-level errors.
fn exit_status(result: Result<u8>) -> u8 {
    match result {
        Ok(code) => code,
        Err(e) => {
            warn!(error = %format!("{e:#}"), "difflint failed");
            EXIT_ERROR
        }
    }
}

/// Run one invocation, writing the project list and report to `out`.
async fn run(cli: &Cli, out: &mut impl Write) -> Result<u8> {
    let session = LintSession::new(cli.run_options()?);
    let deploy = session.options().deploy;
    let color = session.options().lint.color;

    let _span = RunSpan::enter(session.run_id());
    let start = Instant::now();
    emit_run_started(session.run_id(), cli.depth.base_depth(), deploy);

    let classification = session
        .classify()
        .await
        .context("Failed to classify changed projects")?;
    writeln!(out, "{}", project_list_json(&classification.projects)?)?;

    if deploy {
        for line in session.deploy_lines(&classification.projects) {
            writeln!(out, "{line}")?;
        }
        return Ok(EXIT_OK);
    }

    let result = session
        .lint(classification.projects, EnvSnapshot::capture())
        .await
        .context("Lint pipeline failed")?;
    write!(out, "{}", render_lint_report(&result.results, color))?;
    out.flush()?;

    let summary = result.summary();
    emit_run_finished(
        session.run_id(),
        start.elapsed().as_millis() as u64,
        summary.success,
        summary.failed,
        summary.warning,
    );

    if summary.has_failures() {
        info!(failed = summary.failed, "Lint failures found");
    }
    Ok(exit_code(&summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["difflint"]).unwrap();
        assert_eq!(cli.depth.base_depth(), 1);
        assert!(!cli.deploy_mode());
        assert_eq!(cli.timeout_secs, DEFAULT_TIMEOUT_SECS);

        let options = cli.run_options().unwrap();
        assert_eq!(options.deploy_config, DeployConfig::default());
        assert_eq!(options.lint.jshint.display(), "gulp jshint");
        assert_eq!(options.lint.eslint.display(), "gulp lint");
        assert!(options.progress);
    }

    #[test]
    fn test_depth_and_deploy_positionals() {
        let cli = Cli::try_parse_from(["difflint", "3", "deploy"]).unwrap();
        assert_eq!(cli.depth.base_revision(), "HEAD~3");
        assert!(cli.deploy_mode());

        let cli = Cli::try_parse_from(["difflint", "2", ""]).unwrap();
        assert!(!cli.deploy_mode());
    }

    #[test]
    fn test_invalid_depth_is_rejected() {
        assert!(Cli::try_parse_from(["difflint", "0"]).is_err());
        assert!(Cli::try_parse_from(["difflint", "abc"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "difflint",
            "--cwd",
            cwd,
            "--concurrency",
            "2",
            "--timeout-secs",
            "5",
            "--deploy-ignore",
            "worker, admin",
            "--eslint-cmd",
            "npx eslint .",
            "--no-color",
            "--no-progress",
        ])
        .unwrap();

        let options = cli.run_options().unwrap();
        assert_eq!(options.working_dir, dir.path());
        assert_eq!(options.pool.max_concurrent, 2);
        assert_eq!(options.lint.timeout_secs, 5);
        assert_eq!(options.lint.eslint.command, vec!["npx", "eslint", "."]);
        assert!(!options.lint.color);
        assert!(!options.progress);
        assert_eq!(
            options.deploy_config,
            DeployConfig::with_ignore(["worker", "admin"])
        );
    }

    #[test]
    fn test_empty_command_override_fails() {
        let cli = Cli::try_parse_from(["difflint", "--jshint-cmd", "  "]).unwrap();
        assert!(cli.run_options().is_err());
    }

    fn git(repo: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(repo)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn write_file(repo: &Path, rel: &str) {
        let path = repo.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, rel).unwrap();
    }

    /// projA (jshint) and projB (eslint) both touched by the last commit.
    fn monorepo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path();
        git(repo, &["init"]);
        git(repo, &["config", "user.name", "test-user"]);
        git(repo, &["config", "user.email", "test@example.com"]);
        write_file(repo, "projA/.jshintrc_client");
        write_file(repo, "projB/server/.eslintrc.js");
        git(repo, &["add", "-A"]);
        git(repo, &["commit", "-m", "scaffold"]);
        write_file(repo, "projA/index.js");
        write_file(repo, "projB/server/x.js");
        git(repo, &["add", "-A"]);
        git(repo, &["commit", "-m", "change"]);
        dir
    }

    fn cli_for(repo: &Path, extra: &[&str]) -> Cli {
        let cwd = repo.to_str().unwrap();
        let mut args = vec!["difflint", "--cwd", cwd, "--no-color", "--no-progress"];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_exit_code_from_summary() {
        let clean = LintSummary {
            success: 2,
            failed: 0,
            warning: 0,
        };
        let warnings_only = LintSummary {
            success: 0,
            failed: 0,
            warning: 3,
        };
        let failed = LintSummary {
            success: 4,
            failed: 1,
            warning: 1,
        };
        assert_eq!(exit_code(&clean), 0);
        assert_eq!(exit_code(&warnings_only), 0);
        assert_eq!(exit_code(&failed), 1);
    }

    #[test]
    fn test_top_level_error_exits_with_two() {
        assert_eq!(exit_status(Ok(EXIT_LINT_FAILED)), 1);
        assert_eq!(exit_status(Err(anyhow!("git not found"))), 2);
    }

    #[tokio::test]
    async fn test_run_outside_repository_exits_with_two() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_for(dir.path(), &[]);
        let mut out = Vec::new();

        let result = run(&cli, &mut out).await;
        assert!(result.is_err());
        assert!(out.is_empty());
        assert_eq!(exit_status(result), EXIT_ERROR);
    }

    #[tokio::test]
    async fn test_deploy_mode_prints_project_line_then_hints() {
        let repo = monorepo();
        let cli = cli_for(repo.path(), &["1", "deploy"]);
        let mut out = Vec::new();

        let code = run(&cli, &mut out).await.unwrap();
        assert_eq!(code, EXIT_OK);

        let stdout = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("\"alias\":\"projA\""));
        assert_eq!(
            lines[1..].to_vec(),
            vec!["make deploy-esnext-stage", "projB", "make deploy-stage", "projA"]
        );
    }

    #[tokio::test]
    async fn test_lint_mode_exit_codes() {
        let repo = monorepo();

        let cli = cli_for(repo.path(), &["--jshint-cmd", "true", "--eslint-cmd", "true"]);
        let mut out = Vec::new();
        assert_eq!(run(&cli, &mut out).await.unwrap(), EXIT_OK);
        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.lines().next().unwrap().starts_with('['));
        assert!(stdout.ends_with("success: 2 failed: 0 warning: 0\n"));

        let cli = cli_for(repo.path(), &["--jshint-cmd", "false", "--eslint-cmd", "true"]);
        let mut out = Vec::new();
        assert_eq!(run(&cli, &mut out).await.unwrap(), EXIT_LINT_FAILED);
        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.ends_with("success: 1 failed: 1 warning: 0\n"));
    }
}
