//! `gitai commit`: suggest messages for the staged diff and commit one.

use git2::{Oid, Repository};
use tracing::{error, info};

use crate::config::{AppConfig, GitaiCommand};
use crate::env::Environment;
use crate::error::CommandError;
use crate::git;
use crate::llm::{Completion, build_commit_prompt, generate_commit_messages, resolve_llm_config};

use super::Interaction;

const SKIP_CHOICE: &str = "Skip (do not commit)";

/// Flags for `gitai commit`.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Extra instructions appended to the prompt.
    pub prompt: Option<String>,
    /// Overrides `commit.suggestions`.
    pub suggestions: Option<usize>,
    pub print_prompt: bool,
}

/// How a commit run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    NoStagedChanges,
    NotConfigured,
    PromptPrinted(String),
    NoSuggestions,
    Skipped,
    Cancelled,
    Committed(Oid),
}

/// Run the commit flow.
pub async fn run(
    opts: &CommitOptions,
    config: &AppConfig,
    repo: &Repository,
    llm: &dyn Completion,
    env: &dyn Environment,
    ui: &dyn Interaction,
) -> Result<CommitOutcome, CommandError> {
    let Some(diff) = git::staged_diff(repo)? else {
        println!("No staged changes found. Please use \"git add\" to stage your changes.");
        return Ok(CommitOutcome::NoStagedChanges);
    };

    let k = opts
        .suggestions
        .filter(|n| *n > 0)
        .unwrap_or(config.commit.suggestions);
    if k == 0 {
        error!("Number of suggestions is not configured.");
        return Ok(CommitOutcome::NotConfigured);
    }

    let prompt = build_commit_prompt(
        config.commit_system_prompt(),
        &diff,
        opts.prompt.as_deref(),
        k,
    );

    if opts.print_prompt {
        println!("{}", prompt);
        return Ok(CommitOutcome::PromptPrinted(prompt));
    }

    let command = GitaiCommand::Commit.as_str();
    info!(
        "Generating {} commit messages with {}...",
        k,
        resolve_llm_config(config, Some(command), env).model
    );

    let suggestions = generate_commit_messages(llm, config, env, command, &prompt, k)
        .await
        .unwrap_or_default();
    if suggestions.is_empty() {
        println!(
            "AI did not return any suggestions. You might want to try again or adjust your prompt/config."
        );
        return Ok(CommitOutcome::NoSuggestions);
    }

    let mut choices: Vec<String> = suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("({}) {}", i + 1, s.message))
        .collect();
    choices.push(SKIP_CHOICE.to_string());

    let selected = ui.select("Choose a commit message", &choices)?;
    let Some(message) = selected
        .and_then(|idx| suggestions.get(idx))
        .map(|s| s.message.as_str())
    else {
        println!("Commit skipped.");
        return Ok(CommitOutcome::Skipped);
    };

    if !ui.confirm(&format!(
        "Commit with the following message?\n\n  {}\n",
        message
    ))? {
        println!("Commit cancelled.");
        return Ok(CommitOutcome::Cancelled);
    }

    let oid = git::commit(repo, message)?;
    println!("Changes committed successfully.");
    Ok(CommitOutcome::Committed(oid))
}
