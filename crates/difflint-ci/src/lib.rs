//! difflint CI - lint execution for changed monorepo projects
//!
//! Provides the execution half of difflint:
//! - Runs each project's lint command with its runtime pinned in the child env
//! - Attributes failure lines to projects per lint tool
//! - Fans out over a bounded pool and aggregates outcomes or deploy tracks

pub mod env;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod runner;
pub mod session;
pub mod stage;

// Re-export key types
pub use env::EnvSnapshot;
pub use output::{classifier_for, Annotation, EsLintClassifier, JsHintClassifier, OutputClassifier};
pub use pipeline::{lint_project, LintPipeline, PipelineResult};
pub use progress::create_progress_bar;
pub use report::{
    project_list_json, render_lint_report, DeployConfig, DeployGroups, LintSummary,
    DEFAULT_DEPLOY_IGNORE, ESNEXT_DEPLOY_HINT, LEGACY_DEPLOY_HINT,
};
pub use runner::{CommandOutput, LintExecutor, LintRunner};
pub use session::{LintSession, RunOptions};
pub use stage::{LintCommand, LintConfig, DEFAULT_TIMEOUT_SECS};
