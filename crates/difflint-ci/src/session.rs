//! One difflint run: classify the commit range, then lint or group for deploy.

use std::path::PathBuf;
use std::sync::Arc;

use difflint_core::{
    changed_files, resolve_root, Classification, DiffRange, PoolConfig, Project,
    ProjectClassifier, Result,
};
use tracing::info;
use uuid::Uuid;

use crate::env::EnvSnapshot;
use crate::pipeline::{LintPipeline, PipelineResult};
use crate::progress::create_progress_bar;
use crate::report::{DeployConfig, DeployGroups};
use crate::runner::LintRunner;
use crate::stage::LintConfig;

/// Everything a run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the repository root is resolved from.
    pub working_dir: PathBuf,
    pub range: DiffRange,
    pub deploy: bool,
    pub pool: PoolConfig,
    pub lint: LintConfig,
    pub deploy_config: DeployConfig,
    pub progress: bool,
}

impl RunOptions {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            range: DiffRange::default(),
            deploy: false,
            pool: PoolConfig::default(),
            lint: LintConfig::default(),
            deploy_config: DeployConfig::default(),
            progress: false,
        }
    }
}

/// A single run, identified by a fresh run id.
pub struct LintSession {
    run_id: String,
    options: RunOptions,
}

impl LintSession {
    pub fn new(options: RunOptions) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            options,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Resolve the root, list changed files and classify them.
    ///
    /// Fails only on environment errors; per-candidate problems are logged
    /// and the candidate dropped.
    pub async fn classify(&self) -> Result<Classification> {
        let root = resolve_root(&self.options.working_dir)?;
        let changed = changed_files(&root, &self.options.range)?;
        info!(root = %root.display(), files = changed.len(), "Classifying changed files");

        ProjectClassifier::new(root, self.options.pool.clone())
            .classify(&changed)
            .await
    }

    /// Deploy hint lines for the classified projects.
    pub fn deploy_lines(&self, projects: &[Project]) -> Vec<String> {
        let groups = DeployGroups::from_projects(projects, &self.options.deploy_config);
        if groups.is_empty() {
            info!("No deployable projects changed");
        }
        groups.render_lines(self.options.lint.color)
    }

    /// Lint every project with child environments derived from `env`.
    pub async fn lint(&self, projects: Vec<Project>, env: EnvSnapshot) -> Result<PipelineResult> {
        let runner = Arc::new(LintRunner::new(self.options.lint.clone(), env));
        let pipeline = LintPipeline::new(runner, self.options.pool.clone());
        let progress = create_progress_bar(projects.len() as u64 + 1, self.options.progress);

        let result = pipeline.run(projects, &progress).await;
        progress.finish_and_clear();

        let result = result?;
        info!(
            projects = result.results.len(),
            duration_ms = result.duration_ms,
            "Lint pipeline finished"
        );
        Ok(result)
    }
}
