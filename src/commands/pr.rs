//! `gitai pr`: draft a pull-request title and body for the current branch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::Repository;
use tracing::{debug, info, warn};

use crate::config::defaults::DEFAULT_BASE_BRANCH;
use crate::config::{AppConfig, GitaiCommand};
use crate::env::Environment;
use crate::error::CommandError;
use crate::git;
use crate::llm::{Completion, PrPromptInput, build_pr_prompt, generate_pr_draft, resolve_llm_config};

use super::write_atomic;

/// Flags for `gitai pr`.
#[derive(Debug, Clone, Default)]
pub struct PrOptions {
    pub prompt: Option<String>,
    /// Overrides `pr.base_branch`.
    pub target: Option<String>,
    pub unstaged: bool,
    pub no_tree: bool,
    pub print_prompt: bool,
}

/// How a pr run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrOutcome {
    PromptPrinted(String),
    NoDraft,
    Written(PathBuf),
}

/// Run the PR flow. Drafts are written under `<out_root>/.gitai/pr_docs/`.
pub async fn run(
    opts: &PrOptions,
    config: &AppConfig,
    repo: &Repository,
    llm: &dyn Completion,
    env: &dyn Environment,
    out_root: &Path,
) -> Result<PrOutcome, CommandError> {
    debug!("pr options: {:?}", opts);
    let branch = git::current_branch(repo)?;

    let target = opts
        .target
        .as_deref()
        .or(config.pr.base_branch.as_deref())
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_BASE_BRANCH);
    info!("Comparing branch {} -> {}", branch, target);

    let merge_base = git::merge_base(repo, target)?;

    let include_unstaged = opts.unstaged || config.pr.include_unstaged.unwrap_or(false);
    let diff = git::range_diff(
        repo,
        merge_base,
        include_unstaged,
        config.pr.max_lines_per_file.unwrap_or(0),
    )?;

    let include_tree = !opts.no_tree && config.pr.include_file_tree.unwrap_or(true);
    let tree = if include_tree {
        git::list_files_as_tree(repo, None)?
    } else {
        String::new()
    };

    let commits = git::commit_summaries(repo, merge_base)?;

    if config.pr.warn_on_conflict.unwrap_or(true) && git::has_merge_conflicts(repo, target) {
        warn!(
            "Merging {} into {} will cause conflicts. PR description will still be generated, but please resolve conflicts before committing.",
            branch, target
        );
    }

    let prompt = build_pr_prompt(&PrPromptInput {
        system_prompt: config.pr_system_prompt(),
        branch: &branch,
        target,
        diff: &diff,
        tree: &tree,
        commits: &commits,
        user_prompt: opts.prompt.as_deref(),
    });

    if opts.print_prompt {
        println!("{}", prompt);
        return Ok(PrOutcome::PromptPrinted(prompt));
    }

    let command = GitaiCommand::Pr.as_str();
    info!(
        "Using {} to generate PR description...",
        resolve_llm_config(config, Some(command), env).model
    );

    let Some(draft) = generate_pr_draft(llm, config, env, command, &prompt).await else {
        println!("Failed to generate PR description");
        return Ok(PrOutcome::NoDraft);
    };

    let dir = out_root.join(".gitai").join("pr_docs");
    std::fs::create_dir_all(&dir).map_err(|source| CommandError::Io {
        path: dir.clone(),
        source,
    })?;

    let path = dir.join(pr_doc_file_name(&branch, Utc::now()));
    write_atomic(&path, &draft.to_markdown())?;

    println!(
        "PR draft written to {}",
        path.strip_prefix(out_root).unwrap_or(&path).display()
    );
    Ok(PrOutcome::Written(path))
}

/// `<YYYYMMDDHHMM>-<branch>.md`, with `/` in the branch replaced by `-`.
pub fn pr_doc_file_name(branch: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}.md", now.format("%Y%m%d%H%M"), branch.replace('/', "-"))
}
