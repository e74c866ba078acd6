//! Structured observability hooks for difflint run lifecycle events.
//!
//! This module provides:
//! - Run-scoped tracing spans via `RunSpan` RAII guard
//! - Emission functions for key lifecycle events: run start, classification,
//!   per-project lint completion, run finish
//!
//! Events are emitted at `info!` level unless noted (filter with `RUST_LOG`).

use tracing::{info, warn};

/// RAII guard that enters a run-scoped tracing span for the duration of a run.
///
/// # Example
///
/// ```ignore
/// let _span = RunSpan::enter("7c0e...");
/// // every event below carries run_id = "7c0e..."
/// ```
pub struct RunSpan {
    _span: tracing::span::EnteredSpan,
}

impl RunSpan {
    /// Create and enter a span tagged with the run_id.
    pub fn enter(run_id: &str) -> Self {
        let span = tracing::info_span!("difflint.run", run_id = %run_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: run started for `HEAD~depth`.
pub fn emit_run_started(run_id: &str, depth: u32, deploy: bool) {
    info!(event = "run.started", run_id = %run_id, depth = depth, deploy = deploy);
}

/// Emit event: changed files grouped into candidate projects.
pub fn emit_changes_grouped(files: usize, candidates: usize) {
    info!(event = "changes.grouped", files = files, candidates = candidates);
}

/// Emit event: a candidate alias was dropped because probing it failed (warning level).
pub fn emit_candidate_dropped(alias: &str, error: &dyn std::fmt::Display) {
    warn!(event = "candidate.dropped", alias = %alias, error = %error);
}

/// Emit event: a project was classified.
pub fn emit_project_classified(alias: &str, lint_tool: &str, runtime_version: &str) {
    info!(
        event = "project.classified",
        alias = %alias,
        lint_tool = %lint_tool,
        runtime_version = %runtime_version,
    );
}

/// Emit event: a project's lint run finished.
pub fn emit_lint_finished(alias: &str, status: &str, duration_ms: u64) {
    info!(
        event = "lint.finished",
        alias = %alias,
        status = %status,
        duration_ms = duration_ms,
    );
}

/// Emit event: a lint child failed abnormally (warning level).
pub fn emit_lint_failed(alias: &str, error: &dyn std::fmt::Display) {
    warn!(event = "lint.failed", alias = %alias, error = %error);
}

/// Emit event: run finished with per-status counts.
pub fn emit_run_finished(
    run_id: &str,
    duration_ms: u64,
    success: usize,
    failed: usize,
    warning: usize,
) {
    info!(
        event = "run.finished",
        run_id = %run_id,
        duration_ms = duration_ms,
        success = success,
        failed = failed,
        warning = warning,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_span_create() {
        let _span = RunSpan::enter("test-run-id");
        emit_run_started("test-run-id", 1, false);
    }
}
