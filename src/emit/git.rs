//! Git command runner for build scripts.
//!
//! Wraps `git` with captured stdout/stderr and maps failures to
//! [`Error::Git`]. Callers in [`crate::emit`] treat every error as "no data".

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    /// Returns true if stdout is empty.
    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }
}

/// Run a git command in `cwd`.
///
/// Returns [`Error::Git`] if git cannot be spawned or exits non-zero.
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let output = Command::new("git")
        .current_dir(cwd.as_ref())
        .args(args)
        .output()
        .map_err(|e| {
            Error::Git(format!(
                "failed to execute git {}: {}",
                args.first().unwrap_or(&""),
                e
            ))
        })?;

    let git_output = GitOutput::from_output(&output);

    if output.status.success() {
        Ok(git_output)
    } else {
        let exit_code = output.status.code().unwrap_or(-1);
        let error_msg = if git_output.stderr.is_empty() {
            git_output.stdout
        } else {
            git_output.stderr
        };

        Err(Error::Git(format!(
            "git {} failed (exit code {}): {}",
            args.first().unwrap_or(&""),
            exit_code,
            error_msg
        )))
    }
}

/// Full commit identifier of HEAD.
pub fn head_revision<P: AsRef<Path>>(cwd: P) -> Result<String> {
    Ok(run_git(cwd, &["rev-parse", "HEAD"])?.stdout)
}

/// Committer date of HEAD in strict ISO 8601.
pub fn head_commit_time<P: AsRef<Path>>(cwd: P) -> Result<String> {
    Ok(run_git(cwd, &["log", "-1", "--format=%cI", "HEAD"])?.stdout)
}

/// Whether the working tree has uncommitted changes.
pub fn is_modified<P: AsRef<Path>>(cwd: P) -> Result<bool> {
    Ok(!run_git(cwd, &["status", "--porcelain"])?.is_empty())
}

/// Tags pointing at HEAD, in git's listing order.
pub fn tags_at_head<P: AsRef<Path>>(cwd: P) -> Result<Vec<String>> {
    let output = run_git(cwd, &["tag", "--points-at", "HEAD"])?;
    Ok(output.stdout.lines().map(str::to_string).collect())
}

/// Absolute path of the repository's git directory (per worktree).
pub fn git_dir<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    Ok(PathBuf::from(run_git(cwd, &["rev-parse", "--absolute-git-dir"])?.stdout))
}

/// Absolute path of the directory holding refs shared by all worktrees.
pub fn common_dir<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();
    let dir = PathBuf::from(run_git(cwd, &["rev-parse", "--git-common-dir"])?.stdout);
    if dir.is_absolute() {
        Ok(dir)
    } else {
        Ok(cwd.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_test_repo, git};

    #[test]
    fn head_revision_is_full_sha() {
        let repo = create_test_repo();
        let revision = head_revision(repo.path()).unwrap();

        assert_eq!(revision.len(), 40);
        assert!(revision.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn head_commit_time_is_iso8601() {
        let repo = create_test_repo();
        let time = head_commit_time(repo.path()).unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&time).is_ok(), "{time}");
    }

    #[test]
    fn modified_tracks_working_tree() {
        let repo = create_test_repo();
        assert!(!is_modified(repo.path()).unwrap());

        std::fs::write(repo.path().join("dirty.txt"), "dirty\n").unwrap();
        assert!(is_modified(repo.path()).unwrap());
    }

    #[test]
    fn tags_at_head_lists_every_tag() {
        let repo = create_test_repo();
        assert!(tags_at_head(repo.path()).unwrap().is_empty());

        git(repo.path(), &["tag", "nightly"]);
        git(repo.path(), &["tag", "v1.2.0"]);
        assert_eq!(tags_at_head(repo.path()).unwrap(), vec!["nightly", "v1.2.0"]);
    }

    #[test]
    fn git_dirs_resolve_from_nested_directory() {
        let repo = create_test_repo();
        let member = repo.path().join("cmd");
        std::fs::create_dir(&member).unwrap();

        let dir = git_dir(&member).unwrap();
        assert!(dir.is_absolute());
        assert!(dir.join("HEAD").is_file());
        assert!(common_dir(&member).unwrap().join("refs").is_dir());
    }

    #[test]
    fn run_git_outside_repo_is_git_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = run_git(dir.path(), &["rev-parse", "HEAD"]).unwrap_err();
        assert!(matches!(err, Error::Git(_)));
    }
}
