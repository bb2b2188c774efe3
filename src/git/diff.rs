//! Diff text collection using git2.

use git2::{Diff, DiffFormat, ErrorCode, Oid, Repository, Tree};
use tracing::{debug, info};

use crate::error::GitError;

/// Separator placed between the committed range diff and unstaged changes.
pub const UNSTAGED_SEPARATOR: &str = "\n\nThe following changes are unstaged:\n\n";

/// Resolve the HEAD tree.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found).
pub(crate) fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, GitError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(GitError::Read(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(GitError::Read)?;
    Ok(Some(tree))
}

/// Render a diff in unified patch format.
pub fn patch_text(diff: &Diff<'_>) -> Result<String, GitError> {
    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let content = String::from_utf8_lossy(line.content());
        match line.origin() {
            '+' | '-' | ' ' => {
                text.push(line.origin());
                text.push_str(&content);
            }
            _ => text.push_str(&content),
        }
        true
    })
    .map_err(GitError::Diff)?;
    Ok(text)
}

/// Diff of the staged changes against HEAD.
///
/// Returns `None` when nothing is staged. An unborn HEAD is diffed against
/// the empty tree.
pub fn staged_diff(repo: &Repository) -> Result<Option<String>, GitError> {
    let head_tree = resolve_head_tree(repo)?;
    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(GitError::Diff)?;

    if diff.deltas().len() == 0 {
        return Ok(None);
    }

    let text = patch_text(&diff)?;
    Ok((!text.trim().is_empty()).then_some(text))
}

/// Diff from the commit `from` to HEAD, optionally followed by unstaged
/// working tree changes, limited to `max_lines_per_file` content lines per file
/// when that is non-zero.
pub fn range_diff(
    repo: &Repository,
    from: Oid,
    include_unstaged: bool,
    max_lines_per_file: usize,
) -> Result<String, GitError> {
    let from_tree = repo
        .find_commit(from)
        .and_then(|c| c.tree())
        .map_err(GitError::Read)?;
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_tree(Some(&from_tree), head_tree.as_ref(), None)
        .map_err(GitError::Diff)?;
    let limit = |text: String| {
        if max_lines_per_file > 0 {
            limit_diff_lines(&text, max_lines_per_file)
        } else {
            text
        }
    };
    let mut text = limit(patch_text(&diff)?);

    // Each part is limited on its own so the separator is never counted.
    if include_unstaged {
        let unstaged = repo
            .diff_index_to_workdir(None, None)
            .map_err(GitError::Diff)?;
        let unstaged_text = patch_text(&unstaged)?;
        debug!("Including {} unstaged bytes", unstaged_text.len());
        text.push_str(UNSTAGED_SEPARATOR);
        text.push_str(&limit(unstaged_text));
    }

    Ok(text)
}

/// Cap the number of content lines kept per file.
///
/// Files are delimited by `diff --git` lines. Header lines before the first
/// `@@` of a file and the `@@` hunk headers themselves are not counted. Lines
/// past `max_lines` are dropped and replaced by a single
/// `... (N more lines omitted) ...` marker at the end of the file.
pub fn limit_diff_lines(diff: &str, max_lines: usize) -> String {
    let (body, trailing_newline) = match diff.strip_suffix('\n') {
        Some(body) => (body, true),
        None => (diff, false),
    };

    let mut out: Vec<String> = Vec::new();
    let mut in_hunks = false;
    let mut counted = 0usize;
    let mut truncated_files = 0usize;

    let mut finish_file = |out: &mut Vec<String>, counted: usize| {
        if counted > max_lines {
            out.push(format!("... ({} more lines omitted) ...", counted - max_lines));
            truncated_files += 1;
        }
    };

    for line in body.split('\n') {
        if line.starts_with("diff --git ") {
            finish_file(&mut out, counted);
            counted = 0;
            in_hunks = false;
            out.push(line.to_string());
            continue;
        }

        if line.starts_with("@@") {
            in_hunks = true;
            if counted < max_lines {
                out.push(line.to_string());
            }
            continue;
        }

        if !in_hunks {
            out.push(line.to_string());
            continue;
        }

        counted += 1;
        if counted <= max_lines {
            out.push(line.to_string());
        }
    }
    finish_file(&mut out, counted);

    if truncated_files > 0 {
        info!(
            "Diff truncated to {} lines per file ({} file(s) affected)",
            max_lines, truncated_files
        );
    }

    let mut result = out.join("\n");
    if trailing_newline {
        result.push('\n');
    }
    result
}
