//! Domain models for difflint.
//!
//! - `Project`: a changed top-level directory with its resolved lint tool
//! - `LintOutcome` / `ProjectResult`: what linting a project produced
//! - `DiffRange`: the `HEAD~N` commit range under inspection

pub mod error;
pub mod outcome;
pub mod project;

pub use error::{DiffLintError, Result};
pub use outcome::{LintOutcome, LintStatus, ProjectResult};
pub use project::{ChangeGroup, DiffRange, LintTool, Project, RuntimeVersion};
