//! Lint outcomes and per-project results.

use serde::{Deserialize, Serialize};

use crate::domain::project::Project;

/// Status of a single project's lint run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LintStatus {
    /// Tool ran and reported no failure lines.
    Success,

    /// No lint tool configured; nothing executed.
    Warning,

    /// Failure lines matched, or the tool failed abnormally.
    Error,
}

/// Outcome of linting one project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LintOutcome {
    pub status: LintStatus,
    pub raw_output: String,
    pub annotated_output: String,
}

impl LintOutcome {
    /// Outcome for a project without a configured lint tool.
    pub fn warning() -> Self {
        Self {
            status: LintStatus::Warning,
            raw_output: String::new(),
            annotated_output: String::new(),
        }
    }

    pub fn success(raw_output: String, annotated_output: String) -> Self {
        Self {
            status: LintStatus::Success,
            raw_output,
            annotated_output,
        }
    }

    pub fn error(raw_output: String, annotated_output: String) -> Self {
        Self {
            status: LintStatus::Error,
            raw_output,
            annotated_output,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == LintStatus::Error
    }
}

/// A classified project together with its lint outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectResult {
    pub project: Project,
    pub outcome: LintOutcome,
}

impl ProjectResult {
    pub fn new(project: Project, outcome: LintOutcome) -> Self {
        Self { project, outcome }
    }

    pub fn status(&self) -> LintStatus {
        self.outcome.status
    }
}

impl AsRef<Project> for ProjectResult {
    fn as_ref(&self) -> &Project {
        &self.project
    }
}

impl AsRef<Project> for Project {
    fn as_ref(&self) -> &Project {
        self
    }
}
