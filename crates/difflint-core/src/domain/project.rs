//! Project records produced by change classification.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DiffLintError, Result};

/// Lint tool that applies to a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LintTool {
    /// No marker file found; nothing is executed.
    None,

    /// `.jshintrc_client` or `.jshintrc_server` at the project root.
    JsHint,

    /// `server/.eslintrc.js`.
    EsLint,
}

impl LintTool {
    pub fn name(&self) -> &'static str {
        match self {
            LintTool::None => "none",
            LintTool::JsHint => "jshint",
            LintTool::EsLint => "eslint",
        }
    }
}

impl fmt::Display for LintTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime major version a project is linted and deployed with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuntimeVersion {
    #[serde(rename = "4")]
    V4,

    #[serde(rename = "8")]
    V8,
}

impl RuntimeVersion {
    /// The short token ("4" or "8").
    pub fn token(&self) -> &'static str {
        match self {
            RuntimeVersion::V4 => "4",
            RuntimeVersion::V8 => "8",
        }
    }

    /// Full runtime release substituted into `node/vX.Y.Z` PATH segments.
    pub fn full_version(&self) -> &'static str {
        match self {
            RuntimeVersion::V4 => "4.3.1",
            RuntimeVersion::V8 => "8.11.1",
        }
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A changed top-level project of the monorepo.
///
/// Built only through [`Project::new`], which derives the runtime version and
/// lint working directory from the lint tool:
/// - `EsLint` runs with runtime "8" inside `<path>/server/`
/// - everything else runs with runtime "4" inside `<path>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub alias: String,
    pub path: PathBuf,
    pub lint_tool: LintTool,
    pub runtime_version: RuntimeVersion,
    pub lint_path: PathBuf,
}

impl Project {
    pub fn new(alias: impl Into<String>, path: impl Into<PathBuf>, lint_tool: LintTool) -> Self {
        let path = path.into();
        let (runtime_version, lint_path) = match lint_tool {
            LintTool::EsLint => (RuntimeVersion::V8, path.join("server/")),
            LintTool::JsHint | LintTool::None => (RuntimeVersion::V4, path.clone()),
        };
        Self {
            alias: alias.into(),
            path,
            lint_tool,
            runtime_version,
            lint_path,
        }
    }

    /// Project rooted at `path`, named after its basename.
    pub fn from_path(path: &Path, lint_tool: LintTool) -> Self {
        let alias = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(alias, path, lint_tool)
    }
}

/// A candidate project alias and how many changed paths fell under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeGroup {
    pub alias: String,
    pub count: usize,
}

/// Commit range `HEAD~N..HEAD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffRange {
    base_depth: u32,
}

impl DiffRange {
    pub fn new(base_depth: u32) -> Result<Self> {
        if base_depth == 0 {
            return Err(DiffLintError::InvalidDepth(base_depth.to_string()));
        }
        Ok(Self { base_depth })
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let depth = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| DiffLintError::InvalidDepth(raw.to_string()))?;
        Self::new(depth)
    }

    pub fn base_depth(&self) -> u32 {
        self.base_depth
    }

    /// Base revision, e.g. `HEAD~3`.
    pub fn base_revision(&self) -> String {
        format!("HEAD~{}", self.base_depth)
    }
}

impl Default for DiffRange {
    fn default() -> Self {
        Self { base_depth: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eslint_project_runs_v8_in_server_dir() {
        let project = Project::new("payments", "/repo/payments", LintTool::EsLint);
        assert_eq!(project.runtime_version, RuntimeVersion::V8);
        assert!(project.lint_path.to_string_lossy().ends_with("/server/"));
        assert!(project.lint_path.starts_with("/repo/payments"));
    }

    #[test]
    fn test_non_eslint_projects_run_v4_in_place() {
        for tool in [LintTool::JsHint, LintTool::None] {
            let project = Project::new("legacy", "/repo/legacy", tool);
            assert_eq!(project.runtime_version, RuntimeVersion::V4);
            assert_eq!(project.lint_path, PathBuf::from("/repo/legacy"));
        }
    }

    #[test]
    fn test_project_alias_from_basename() {
        let project = Project::from_path(Path::new("/repo/admin-web"), LintTool::None);
        assert_eq!(project.alias, "admin-web");
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let project = Project::new("api", "/repo/api", LintTool::JsHint);
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["alias"], "api");
        assert_eq!(value["lintTool"], "jshint");
        assert_eq!(value["runtimeVersion"], "4");
        assert_eq!(value["lintPath"], "/repo/api");
    }

    #[test]
    fn test_runtime_versions() {
        assert_eq!(RuntimeVersion::V4.token(), "4");
        assert_eq!(RuntimeVersion::V8.full_version(), "8.11.1");
        assert_eq!(RuntimeVersion::V4.full_version(), "4.3.1");
    }

    #[test]
    fn test_diff_range_rejects_zero() {
        assert!(DiffRange::new(0).is_err());
        assert!(DiffRange::parse("0").is_err());
        assert!(DiffRange::parse("-2").is_err());
        assert!(DiffRange::parse("abc").is_err());
    }

    #[test]
    fn test_diff_range_revision() {
        let range = DiffRange::parse("3").unwrap();
        assert_eq!(range.base_depth(), 3);
        assert_eq!(range.base_revision(), "HEAD~3");
        assert_eq!(DiffRange::default().base_revision(), "HEAD~1");
    }
}
