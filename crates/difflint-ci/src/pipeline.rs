//! Lint pipeline orchestration across changed projects.

use std::sync::Arc;
use std::time::Instant;

use difflint_core::{
    emit_lint_failed, emit_lint_finished, map_ordered_with, LintOutcome, LintStatus, PoolConfig,
    Project, ProjectResult, Result,
};
use indicatif::ProgressBar;
use tracing::info;

use crate::report::LintSummary;
use crate::runner::LintExecutor;

/// Result of linting every changed project.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// One result per project, in classification order.
    pub results: Vec<ProjectResult>,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl PipelineResult {
    pub fn summary(&self) -> LintSummary {
        LintSummary::tally(&self.results)
    }

    /// Whether no project ended in an Error outcome.
    pub fn success(&self) -> bool {
        !self.summary().has_failures()
    }
}

/// Lints projects concurrently through a bounded pool.
pub struct LintPipeline {
    executor: Arc<dyn LintExecutor>,
    pool: PoolConfig,
}

impl LintPipeline {
    pub fn new(executor: Arc<dyn LintExecutor>, pool: PoolConfig) -> Self {
        Self { executor, pool }
    }

    /// Lint every project and return results in input order.
    ///
    /// `progress` is sized to `projects.len() + 1`, ticked once before any
    /// work starts and once per finished project. A project whose lint fails
    /// abnormally gets an Error outcome; the batch always continues.
    pub async fn run(
        &self,
        projects: Vec<Project>,
        progress: &ProgressBar,
    ) -> Result<PipelineResult> {
        let start = Instant::now();
        let total = projects.len();

        progress.set_length(total as u64 + 1);
        progress.inc(1);

        info!(
            projects = total,
            max_concurrent = self.pool.max_concurrent,
            "Starting lint pipeline"
        );

        let executor = Arc::clone(&self.executor);
        let results = map_ordered_with(
            projects,
            &self.pool,
            move |project| {
                let executor = Arc::clone(&executor);
                async move { lint_project(executor.as_ref(), project).await }
            },
            |_| progress.inc(1),
        )
        .await?;

        Ok(PipelineResult {
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Lint one project, folding execution failures into an Error outcome.
pub async fn lint_project(executor: &dyn LintExecutor, project: Project) -> ProjectResult {
    let start = Instant::now();

    let outcome = match executor.lint(&project).await {
        Ok(outcome) => outcome,
        Err(e) => {
            emit_lint_failed(&project.alias, &e);
            LintOutcome::error(
                String::new(),
                format!("{} \n {}", project.path.display(), e),
            )
        }
    };

    let status = match outcome.status {
        LintStatus::Success => "success",
        LintStatus::Warning => "warning",
        LintStatus::Error => "error",
    };
    emit_lint_finished(&project.alias, status, start.elapsed().as_millis() as u64);

    ProjectResult::new(project, outcome)
}
