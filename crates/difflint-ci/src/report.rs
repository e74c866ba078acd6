//! Result aggregation: lint summary and deploy grouping.
//!
//! Both reductions are pure functions over the classified projects or their
//! results; rendering returns strings and leaves printing to the caller.

use std::collections::BTreeSet;

use difflint_core::{LintStatus, Project, ProjectResult, Result, RuntimeVersion};
use owo_colors::OwoColorize;

/// Hint printed above the runtime "8" deploy list.
pub const ESNEXT_DEPLOY_HINT: &str = "make deploy-esnext-stage";

/// Hint printed above the runtime "4" deploy list.
pub const LEGACY_DEPLOY_HINT: &str = "make deploy-stage";

/// Reserved project names that never appear in deploy hints.
pub const DEFAULT_DEPLOY_IGNORE: [&str; 2] = ["worker", "test"];

/// One-line JSON of the classified project list.
pub fn project_list_json(projects: &[Project]) -> Result<String> {
    Ok(serde_json::to_string(projects)?)
}

// ── lint summary ───────────────────────────────────────────────────────────

/// Per-status project counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSummary {
    pub success: usize,
    pub failed: usize,
    pub warning: usize,
}

impl LintSummary {
    pub fn tally(results: &[ProjectResult]) -> Self {
        results
            .iter()
            .fold(Self::default(), |mut summary, result| {
                match result.status() {
                    LintStatus::Success => summary.success += 1,
                    LintStatus::Warning => summary.warning += 1,
                    LintStatus::Error => summary.failed += 1,
                }
                summary
            })
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// `success: <n> failed: <n> warning: <n>`
    pub fn render(&self, color: bool) -> String {
        let success = format!("success: {}", self.success);
        let failed = format!("failed: {}", self.failed);
        let warning = format!("warning: {}", self.warning);
        if color {
            format!("{} {} {}", success.green(), failed.red(), warning.yellow())
        } else {
            format!("{} {} {}", success, failed, warning)
        }
    }
}

/// Per-project lint output blocks followed by the summary line.
pub fn render_lint_report(results: &[ProjectResult], color: bool) -> String {
    let mut report = String::new();
    for result in results {
        if result.outcome.annotated_output.is_empty() {
            continue;
        }
        report.push_str(&result.outcome.annotated_output);
        report.push_str("\n\n");
    }
    report.push_str(&LintSummary::tally(results).render(color));
    report.push('\n');
    report
}

// ── deploy grouping ────────────────────────────────────────────────────────

/// Deploy grouping configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Aliases excluded from every deploy list.
    pub ignore: BTreeSet<String>,
}

impl DeployConfig {
    pub fn with_ignore<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore: aliases.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::with_ignore(DEFAULT_DEPLOY_IGNORE)
    }
}

/// Changed projects partitioned by deploy track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployGroups {
    /// Runtime "8" aliases.
    pub esnext: Vec<String>,

    /// Runtime "4" aliases.
    pub legacy: Vec<String>,
}

impl DeployGroups {
    /// Works on pre-lint projects and post-lint results alike.
    pub fn from_projects<P: AsRef<Project>>(projects: &[P], config: &DeployConfig) -> Self {
        let mut groups = Self::default();
        for item in projects {
            let project: &Project = item.as_ref();
            if config.ignore.contains(&project.alias) {
                continue;
            }
            match project.runtime_version {
                RuntimeVersion::V8 => groups.esnext.push(project.alias.clone()),
                RuntimeVersion::V4 => groups.legacy.push(project.alias.clone()),
            }
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.esnext.is_empty() && self.legacy.is_empty()
    }

    /// Hint line then comma-joined aliases, runtime "8" before "4".
    pub fn render_lines(&self, color: bool) -> Vec<String> {
        let mut lines = Vec::new();
        for (hint, aliases) in [
            (ESNEXT_DEPLOY_HINT, &self.esnext),
            (LEGACY_DEPLOY_HINT, &self.legacy),
        ] {
            if aliases.is_empty() {
                continue;
            }
            let joined = aliases.join(",");
            if color {
                lines.push(hint.blue().to_string());
                lines.push(joined.green().to_string());
            } else {
                lines.push(hint.to_string());
                lines.push(joined);
            }
        }
        lines
    }
}
