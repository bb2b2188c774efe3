//! Git operations using git2-rs.

pub mod diff;
pub mod repo;

pub use diff::{limit_diff_lines, range_diff, staged_diff};
pub use repo::{
    commit, commit_summaries, current_branch, has_merge_conflicts, list_files_as_tree, merge_base,
    open, repo_root,
};
