//! Change classification: changed paths → candidate projects → typed projects.
//!
//! Three steps, the last two fanned out through [`map_ordered`]:
//! 1. group changed paths by their first segment (first-seen order)
//! 2. keep candidates that resolve to an existing directory under the root
//! 3. resolve the lint tool from marker files (eslint marker checked first)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::{DiffLintError, Result};
use crate::domain::project::{ChangeGroup, LintTool, Project};
use crate::obs;
use crate::parallel::{map_ordered, PoolConfig};

/// Server-side eslint config, relative to the project directory.
pub const ESLINT_MARKER: &str = "server/.eslintrc.js";

/// Client- and server-side jshint configs, relative to the project directory.
pub const JSHINT_MARKERS: [&str; 2] = [".jshintrc_client", ".jshintrc_server"];

/// Result of classifying a set of changed paths.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Every candidate alias with its occurrence count.
    pub groups: Vec<ChangeGroup>,

    /// Candidates that are real project directories, in first-seen order.
    pub projects: Vec<Project>,
}

/// Group changed paths by first path segment, preserving first-seen order.
///
/// Blank lines and entries without a usable first segment are dropped.
pub fn group_changed_paths<S: AsRef<str>>(paths: &[S]) -> Vec<ChangeGroup> {
    let mut groups: Vec<ChangeGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for raw in paths {
        let line = raw.as_ref().trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let alias = match line.split('/').next() {
            Some(segment) if !segment.is_empty() && segment != "." && segment != ".." => segment,
            _ => continue,
        };

        match index.get(alias) {
            Some(&pos) => groups[pos].count += 1,
            None => {
                index.insert(alias.to_string(), groups.len());
                groups.push(ChangeGroup {
                    alias: alias.to_string(),
                    count: 1,
                });
            }
        }
    }

    groups
}

/// Resolve the lint tool for a project directory.
///
/// `server/.eslintrc.js` wins; the jshint markers are only consulted when it
/// is absent. Probe failures count as "marker absent".
pub async fn resolve_lint_tool(project_dir: &Path) -> LintTool {
    if is_file(&project_dir.join(ESLINT_MARKER)).await {
        return LintTool::EsLint;
    }
    for marker in JSHINT_MARKERS {
        if is_file(&project_dir.join(marker)).await {
            return LintTool::JsHint;
        }
    }
    LintTool::None
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

/// Whether `path` is an existing directory. Stat failures surface as
/// [`DiffLintError::FileSystem`].
pub async fn probe_project_dir(path: &Path) -> Result<bool> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_dir()),
        Err(source) => Err(DiffLintError::FileSystem {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Classifies changed paths under a repository root into [`Project`]s.
pub struct ProjectClassifier {
    root: PathBuf,
    pool: PoolConfig,
}

impl ProjectClassifier {
    pub fn new(root: impl Into<PathBuf>, pool: PoolConfig) -> Self {
        Self {
            root: root.into(),
            pool,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run all three classification steps.
    pub async fn classify<S: AsRef<str>>(&self, changed: &[S]) -> Result<Classification> {
        let groups = group_changed_paths(changed);
        obs::emit_changes_grouped(changed.len(), groups.len());

        let dirs = self.existing_dirs(&groups).await?;
        let projects = self.resolve_projects(dirs).await?;

        Ok(Classification { groups, projects })
    }

    /// Keep the candidates that resolve to directories under the root.
    pub async fn existing_dirs(&self, groups: &[ChangeGroup]) -> Result<Vec<PathBuf>> {
        let candidates: Vec<(String, PathBuf)> = groups
            .iter()
            .map(|g| (g.alias.clone(), self.root.join(&g.alias)))
            .collect();

        let probed = map_ordered(candidates, &self.pool, |(alias, path)| async move {
            match probe_project_dir(&path).await {
                Ok(true) => Some(path),
                Ok(false) => {
                    debug!(alias = %alias, "candidate is not a directory");
                    None
                }
                Err(e) => {
                    obs::emit_candidate_dropped(&alias, &e);
                    None
                }
            }
        })
        .await?;

        Ok(probed.into_iter().flatten().collect())
    }

    /// Resolve lint tool and runtime for each project directory.
    pub async fn resolve_projects(&self, dirs: Vec<PathBuf>) -> Result<Vec<Project>> {
        let projects = map_ordered(dirs, &self.pool, |dir| async move {
            let tool = resolve_lint_tool(&dir).await;
            Project::from_path(&dir, tool)
        })
        .await?;

        for project in &projects {
            obs::emit_project_classified(
                &project.alias,
                project.lint_tool.name(),
                project.runtime_version.token(),
            );
        }
        Ok(projects)
    }
}
