//! Repository discovery, history and commit operations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use git2::{BranchType, Oid, Repository, Sort, Status, StatusOptions};
use tracing::{debug, warn};

use crate::error::GitError;

/// Number of hex digits shown for abbreviated commit ids.
const SHORT_SHA_LEN: usize = 7;

/// Working directory root of the repository containing `cwd`, if any.
pub fn repo_root(cwd: &Path) -> Option<PathBuf> {
    match Repository::discover(cwd) {
        Ok(repo) => repo.workdir().map(|dir| dir.components().collect()),
        Err(e) => {
            debug!("No git repository above {}: {}", cwd.display(), e);
            None
        }
    }
}

/// Open the repository containing `cwd`.
pub fn open(cwd: &Path) -> Result<Repository, GitError> {
    Repository::discover(cwd).map_err(GitError::Open)
}

/// Short name of the checked-out branch, or `HEAD` when detached.
pub fn current_branch(repo: &Repository) -> Result<String, GitError> {
    match repo.head() {
        Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or("HEAD").to_string()),
        Ok(_) => Ok("HEAD".to_string()),
        Err(_) => {
            // Unborn branch: HEAD is symbolic but points at nothing yet.
            let head = repo.find_reference("HEAD").map_err(GitError::Read)?;
            Ok(head
                .symbolic_target()
                .and_then(|t| t.strip_prefix("refs/heads/"))
                .unwrap_or("HEAD")
                .to_string())
        }
    }
}

/// Merge base of HEAD and the local branch `target`.
pub fn merge_base(repo: &Repository, target: &str) -> Result<Oid, GitError> {
    let branch = repo
        .find_branch(target, BranchType::Local)
        .map_err(|_| GitError::BranchNotFound(target.to_string()))?;
    let target_oid = branch
        .get()
        .peel_to_commit()
        .map_err(|e| GitError::MergeBase(target.to_string(), e))?
        .id();
    let head_oid = repo
        .head()
        .and_then(|h| h.peel_to_commit())
        .map_err(|e| GitError::MergeBase(target.to_string(), e))?
        .id();

    repo.merge_base(target_oid, head_oid)
        .map_err(|e| GitError::MergeBase(target.to_string(), e))
}

/// `<short-sha> <summary>` for each commit in `from..HEAD`, newest first.
pub fn commit_summaries(repo: &Repository, from: Oid) -> Result<String, GitError> {
    let mut revwalk = repo.revwalk().map_err(GitError::Read)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(GitError::Read)?;
    revwalk.push_head().map_err(GitError::Read)?;
    revwalk.hide(from).map_err(GitError::Read)?;

    let mut lines = Vec::new();
    for oid in revwalk {
        let oid = oid.map_err(GitError::Read)?;
        let commit = repo.find_commit(oid).map_err(GitError::Read)?;
        let sha = oid.to_string();
        lines.push(format!(
            "{} {}",
            &sha[..SHORT_SHA_LEN],
            commit.summary().unwrap_or("")
        ));
    }

    Ok(lines.join("\n"))
}

/// Tracked plus untracked, non-ignored files rendered as an indented tree.
///
/// With `max_depth`, deeper paths are cut at that depth and suffixed `/...`.
pub fn list_files_as_tree(repo: &Repository, max_depth: Option<usize>) -> Result<String, GitError> {
    let mut files: Vec<String> = Vec::new();

    let index = repo.index().map_err(GitError::Read)?;
    for entry in index.iter() {
        files.push(String::from_utf8_lossy(&entry.path).into_owned());
    }

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = repo.statuses(Some(&mut opts)).map_err(GitError::Read)?;
    for entry in statuses.iter() {
        if entry.status().contains(Status::WT_NEW)
            && let Some(path) = entry.path()
        {
            files.push(path.to_string());
        }
    }

    files.sort();
    files.dedup();

    Ok(render_tree(&files, max_depth))
}

fn render_tree(files: &[String], max_depth: Option<usize>) -> String {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();

    for file in files {
        let segments: Vec<&str> = file.split('/').collect();
        let depth = match max_depth {
            Some(max) if max > 0 => max.min(segments.len()),
            _ => segments.len(),
        };
        for (i, segment) in segments.iter().take(depth).enumerate() {
            let cut = i == depth - 1 && depth < segments.len();
            let line = format!(
                "{}{}{}",
                "  ".repeat(i),
                segment,
                if cut { "/..." } else { "" }
            );
            if seen.insert(line.clone()) {
                lines.push(line);
            }
        }
    }

    lines.join("\n")
}

/// Whether merging `target` into HEAD would conflict.
///
/// Runs an in-memory merge; the working tree is not touched. Any failure is
/// logged and reported as no conflict.
pub fn has_merge_conflicts(repo: &Repository, target: &str) -> bool {
    let result = (|| -> Result<bool, git2::Error> {
        let theirs = repo.revparse_single(target)?.peel_to_commit()?;
        let ours = repo.head()?.peel_to_commit()?;
        let index = repo.merge_commits(&ours, &theirs, None)?;
        Ok(index.has_conflicts())
    })();

    match result {
        Ok(conflicts) => conflicts,
        Err(e) => {
            debug!("Error checking for merge conflicts with {}: {}", target, e);
            false
        }
    }
}

/// Commit the current index onto HEAD. Returns the new commit id.
pub fn commit(repo: &Repository, message: &str) -> Result<Oid, GitError> {
    let signature = repo.signature().map_err(GitError::Signature)?;

    let mut index = repo.index().map_err(GitError::Commit)?;
    let tree_id = index.write_tree().map_err(GitError::Commit)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::Commit)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(GitError::Commit)?),
        Err(e) => {
            warn!("Creating root commit ({})", e.message());
            None
        }
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .map_err(GitError::Commit)
}
