//! Prompt construction for commit messages and pull-request drafts.

/// Inputs for [`build_pr_prompt`].
#[derive(Debug, Clone, Default)]
pub struct PrPromptInput<'a> {
    pub system_prompt: &'a str,
    pub branch: &'a str,
    pub target: &'a str,
    pub diff: &'a str,
    pub tree: &'a str,
    pub commits: &'a str,
    pub user_prompt: Option<&'a str>,
}

/// Build the commit-message prompt for `k` suggestions.
pub fn build_commit_prompt(
    system_prompt: &str,
    diff: &str,
    user_prompt: Option<&str>,
    k: usize,
) -> String {
    let system_prompt = system_prompt.replace("{{ suggestions }}", &k.to_string());

    let mut prompt = format!(
        "{system_prompt}\n\nHere is the file diff:\n```diff\n{}\n```\n",
        fence_safe(diff)
    );
    if let Some(extra) = user_prompt.filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!("\nAdditional instructions from user: {extra}\n"));
    }
    prompt.push_str(&format!("\nPlease provide {k} commit message suggestions."));
    prompt
}

/// Build the PR prompt by filling the template placeholders.
pub fn build_pr_prompt(input: &PrPromptInput<'_>) -> String {
    let tree = if input.tree.trim().is_empty() {
        "No file tree"
    } else {
        input.tree
    };
    let commits = if input.commits.trim().is_empty() {
        "No commit history"
    } else {
        input.commits
    };

    // Conditionals are dropped; the fallbacks above stand in for empty sections.
    let mut prompt = input
        .system_prompt
        .replace("{{#if tree}}", "")
        .replace("{{#if commits}}", "")
        .replace("{{/if}}", "")
        .replace("{{ branch }}", input.branch)
        .replace("{{ target }}", input.target)
        .replace("{{ tree }}", tree)
        .replace("{{ commits }}", commits)
        .replace("{{ diff }}", &fence_safe(input.diff));

    if let Some(extra) = input.user_prompt.filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!("\n\nAdditional instructions: {extra}"));
    }

    prompt
}

/// Keep embedded code fences from closing the surrounding fence.
fn fence_safe(text: &str) -> String {
    text.replace("```", "'''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_prompt_structure() {
        let prompt = build_commit_prompt(
            "Give {{ suggestions }} options.",
            "diff --git a/x b/x\n+hello",
            Some("Use feat as commit type"),
            4,
        );

        assert!(prompt.starts_with("Give 4 options."));
        assert!(prompt.contains("```diff\ndiff --git a/x b/x\n+hello\n```"));
        assert!(prompt.contains("Additional instructions from user: Use feat as commit type"));
        assert!(prompt.ends_with("Please provide 4 commit message suggestions."));
    }

    #[test]
    fn commit_prompt_without_user_instructions() {
        let prompt = build_commit_prompt("sys", "d", None, 1);
        assert!(!prompt.contains("Additional instructions"));
    }

    #[test]
    fn diff_fences_are_neutralized() {
        let prompt = build_commit_prompt("sys", "+```rust\n+fn a() {}\n+```", None, 1);
        assert_eq!(prompt.matches("```").count(), 2);
    }

    #[test]
    fn pr_prompt_fills_placeholders() {
        let template = "{{ branch }} -> {{ target }}\n{{#if commits}}{{ commits }}{{/if}}\n{{#if tree}}{{ tree }}{{/if}}\n{{ diff }}";
        let prompt = build_pr_prompt(&PrPromptInput {
            system_prompt: template,
            branch: "feature/auth",
            target: "main",
            diff: "+added",
            tree: "src\n  main.rs",
            commits: "abc1234 add login",
            user_prompt: Some("Mention the ticket"),
        });

        assert!(prompt.starts_with("feature/auth -> main\nabc1234 add login\nsrc\n  main.rs\n+added"));
        assert!(!prompt.contains("{{"));
        assert!(prompt.ends_with("\n\nAdditional instructions: Mention the ticket"));
    }

    #[test]
    fn pr_prompt_uses_placeholders_for_empty_sections() {
        let prompt = build_pr_prompt(&PrPromptInput {
            system_prompt: "{{ tree }}|{{ commits }}",
            ..Default::default()
        });
        assert_eq!(prompt, "No file tree|No commit history");
    }
}
