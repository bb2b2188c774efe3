//! System-prompt template loading.

use std::path::Path;

use tracing::{debug, warn};

use super::defaults::{FALLBACK_COMMIT_PROMPT, FALLBACK_PR_PROMPT};
use super::types::AppConfig;

/// Fill `commit.systemPrompt` and `pr.systemPrompt` from their templates.
///
/// Template paths are resolved against `base_dir`. Unreadable templates are
/// logged and replaced by any explicit `systemPrompt`, then by a built-in
/// one-liner. Both prompts are non-empty afterwards.
pub fn fill_system_prompts(config: &mut AppConfig, base_dir: &Path) {
    config.commit.system_prompt = resolve_prompt(
        "commit",
        config.commit.prompt_template.as_deref(),
        config.commit.system_prompt.take(),
        base_dir,
        FALLBACK_COMMIT_PROMPT,
    );
    config.pr.system_prompt = resolve_prompt(
        "PR",
        config.pr.prompt_template.as_deref(),
        config.pr.system_prompt.take(),
        base_dir,
        FALLBACK_PR_PROMPT,
    );
}

fn resolve_prompt(
    label: &str,
    template: Option<&str>,
    explicit: Option<String>,
    base_dir: &Path,
    fallback: &str,
) -> Option<String> {
    if let Some(template) = template.filter(|t| !t.is_empty()) {
        let path = base_dir.join(template);
        debug!("Loading {} prompt from {}", label, path.display());
        match std::fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => return Some(text),
            Ok(_) => warn!("{} prompt template {} is empty.", label, path.display()),
            Err(e) => warn!(
                "Failed to load {} prompt from {}: {}. Using fallback.",
                label,
                path.display(),
                e
            ),
        }
    }

    Some(
        explicit
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    )
}
