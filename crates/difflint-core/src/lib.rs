//! difflint Core Library
//!
//! Change classification for monorepo CI: resolve the repository root, list
//! the files a commit range touched, and turn them into typed projects with
//! a lint tool and runtime version each.

pub mod classify;
pub mod domain;
pub mod git;
pub mod obs;
pub mod parallel;
pub mod telemetry;

pub use classify::{
    group_changed_paths, resolve_lint_tool, Classification, ProjectClassifier, ESLINT_MARKER,
    JSHINT_MARKERS,
};

pub use domain::{
    ChangeGroup, DiffLintError, DiffRange, LintOutcome, LintStatus, LintTool, Project,
    ProjectResult, Result, RuntimeVersion,
};

pub use git::{changed_files, resolve_root};

pub use obs::{
    emit_candidate_dropped, emit_changes_grouped, emit_lint_failed, emit_lint_finished,
    emit_project_classified, emit_run_finished, emit_run_started, RunSpan,
};
pub use parallel::{map_ordered, map_ordered_with, PoolConfig};
pub use telemetry::init_tracing;

/// difflint version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
