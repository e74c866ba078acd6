//! Lint command execution for a single project.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use difflint_core::{DiffLintError, LintOutcome, Project, Result};
use tokio::process::Command;
use tracing::debug;

use crate::env::EnvSnapshot;
use crate::output::classifier_for;
use crate::stage::LintConfig;

/// Result of running a lint command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (-1 when killed by a signal).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the process exited successfully.
    pub success: bool,
}

impl CommandOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        text.push_str(&self.stderr);
        text
    }
}

/// Lints one project and produces its outcome.
///
/// Implementations return `Err(DiffLintError::LintExecution { .. })` for
/// abnormal failures; the pipeline turns those into Error outcomes.
#[async_trait]
pub trait LintExecutor: Send + Sync {
    async fn lint(&self, project: &Project) -> Result<LintOutcome>;
}

/// Runs the configured lint command for a project as a child process.
pub struct LintRunner {
    config: LintConfig,
    env: EnvSnapshot,
}

impl LintRunner {
    pub fn new(config: LintConfig, env: EnvSnapshot) -> Self {
        Self { config, env }
    }

    /// Execute `command` in `cwd` with exactly `envs` as its environment.
    ///
    /// A `timeout_secs` of 0 waits forever. On timeout the child is killed.
    pub async fn execute_command(
        command: &[String],
        cwd: &Path,
        envs: &BTreeMap<OsString, OsString>,
        timeout_secs: u64,
    ) -> std::io::Result<CommandOutput> {
        let start = Instant::now();

        let (exe, args) = command.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty lint command")
        })?;

        let child = Command::new(exe)
            .args(args)
            .current_dir(cwd)
            .env_clear()
            .envs(envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = if timeout_secs > 0 {
            tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
                .await
                .map_err(|_| {
                    std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("timed out after {timeout_secs} seconds"),
                    )
                })??
        } else {
            child.wait_with_output().await?
        };

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration_ms: start.elapsed().as_millis() as u64,
            success: output.status.success(),
        })
    }
}

#[async_trait]
impl LintExecutor for LintRunner {
    async fn lint(&self, project: &Project) -> Result<LintOutcome> {
        let (command, classifier) = match (
            self.config.command_for(project.lint_tool),
            classifier_for(project.lint_tool),
        ) {
            (Some(command), Some(classifier)) => (command, classifier),
            _ => return Ok(LintOutcome::warning()),
        };

        debug!(
            alias = %project.alias,
            command = %command.display(),
            cwd = %project.lint_path.display(),
            "running lint command"
        );

        let envs = self.env.patched_for(project.runtime_version);
        let output = Self::execute_command(
            &command.command,
            &project.lint_path,
            &envs,
            self.config.timeout_secs,
        )
        .await
        .map_err(|e| DiffLintError::LintExecution {
            alias: project.alias.clone(),
            message: format!("{}: {e}", command.display()),
        })?;
        debug!(
            alias = %project.alias,
            exit_code = output.exit_code,
            duration_ms = output.duration_ms,
            "lint command exited"
        );

        let raw = output.combined();
        let annotation = classifier.annotate(&project.alias, &raw, self.config.color);
        let annotated = format!("{} \n {}", project.path.display(), annotation.text);

        if annotation.has_failures() {
            return Ok(LintOutcome::error(raw, annotated));
        }
        if !output.success {
            return Err(DiffLintError::LintExecution {
                alias: project.alias.clone(),
                message: format!(
                    "{} exited with code {}: {}",
                    command.display(),
                    output.exit_code,
                    raw.trim()
                ),
            });
        }
        Ok(LintOutcome::success(raw, annotated))
    }
}
