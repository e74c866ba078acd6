//! Git collaborators: repository root resolution and changed-file listing.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::domain::error::{DiffLintError, Result};
use crate::domain::project::DiffRange;

/// Resolve the top-level directory of the repository containing `working_dir`.
///
/// Runs `git rev-parse --show-toplevel`. Returns an error if the directory is
/// missing, not inside a git repository, or if git is not available.
pub fn resolve_root(working_dir: &Path) -> Result<PathBuf> {
    if !working_dir.is_dir() {
        return Err(DiffLintError::Environment(format!(
            "working directory {} does not exist or is not a directory",
            working_dir.display()
        )));
    }
    let stdout = run_git(working_dir, &["rev-parse", "--show-toplevel"])?;
    let root = stdout.trim_end_matches(['\r', '\n']);
    if root.is_empty() {
        return Err(DiffLintError::Environment(
            "git rev-parse --show-toplevel returned empty output".to_string(),
        ));
    }
    debug!(root = %root, "resolved repository root");
    Ok(PathBuf::from(root))
}

/// List paths (relative to `root`) that differ between `HEAD~N` and `HEAD`.
///
/// Paths are read NUL-separated with quoting disabled, so non-ASCII names
/// come back verbatim.
pub fn changed_files(root: &Path, range: &DiffRange) -> Result<Vec<String>> {
    let base = range.base_revision();
    let stdout = run_git(
        root,
        &["-c", "core.quotePath=false", "diff", "--name-only", "-z", &base, "HEAD"],
    )?;
    let files: Vec<String> = stdout
        .split('\0')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect();
    debug!(base = %base, files = files.len(), "listed changed files");
    Ok(files)
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            DiffLintError::Environment(format!("failed to run git in {}: {e}", dir.display()))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffLintError::Environment(format!(
            "git {} failed: {}",
            args.join(" "),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::process::Command as StdCommand;

    fn git(repo_dir: &Path, args: &[&str]) {
        let output = StdCommand::new("git")
            .args(args)
            .current_dir(repo_dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn make_git_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init"]);
        git(dir.path(), &["config", "user.name", "test-user"]);
        git(dir.path(), &["config", "user.email", "test@example.com"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    fn commit_file(repo_dir: &Path, rel: &str) {
        let path = repo_dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, rel).unwrap();
        git(repo_dir, &["add", "."]);
        git(repo_dir, &["commit", "-m", rel]);
    }

    #[test]
    fn test_resolve_root_from_subdirectory() {
        let repo = make_git_repo();
        let nested = repo.path().join("svc").join("src");
        std::fs::create_dir_all(&nested).unwrap();

        let root = resolve_root(&nested).unwrap();
        assert_eq!(
            root.canonicalize().unwrap(),
            repo.path().canonicalize().unwrap()
        );
        assert!(!root.to_string_lossy().ends_with('\n'));
    }

    #[test]
    fn test_resolve_root_fails_outside_repo() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_root(dir.path()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_changed_files_lists_last_commit() {
        let repo = make_git_repo();
        commit_file(repo.path(), "alpha/index.js");
        commit_file(repo.path(), "beta/lib/util.js");

        let range = DiffRange::new(1).unwrap();
        let files = changed_files(repo.path(), &range).unwrap();
        assert_eq!(files, vec!["beta/lib/util.js".to_string()]);

        let range = DiffRange::new(2).unwrap();
        let mut files = changed_files(repo.path(), &range).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec!["alpha/index.js".to_string(), "beta/lib/util.js".to_string()]
        );
    }

    #[test]
    fn test_changed_files_fails_beyond_history() {
        let repo = make_git_repo();
        let range = DiffRange::new(5).unwrap();
        let err = changed_files(repo.path(), &range).unwrap_err();
        assert!(matches!(err, DiffLintError::Environment(_)));
    }

    #[test]
    fn test_changed_files_keeps_non_ascii_paths_verbatim() {
        let repo = make_git_repo();
        commit_file(repo.path(), "café/index.js");

        let files = changed_files(repo.path(), &DiffRange::default()).unwrap();
        assert_eq!(files, vec!["café/index.js".to_string()]);
    }

    #[test]
    fn test_resolve_root_names_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_root(&missing).unwrap_err();
        assert!(err.is_fatal());
        let message = err.to_string();
        assert!(message.contains("nope"));
        assert!(!message.contains("failed to run git"));
    }
}
