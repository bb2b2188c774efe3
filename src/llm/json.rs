//! Structured data recovery from LLM replies.
//!
//! Models often wrap JSON in markdown fences or conversational text. Recovery
//! runs in two stages: a strict parse of the fence-stripped reply, then a scan
//! over every opening bracket in the raw text that extracts a balanced,
//! string-aware span and parses that. The scan is a heuristic; adversarial
//! input can still defeat it, in which case the caller gets an empty list or
//! `None` rather than an error.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*```[A-Za-z]*\s*|\s*```\s*$").expect("fence pattern is valid")
});

/// One commit-message suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSuggestion {
    pub message: String,
}

/// A pull-request draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDraft {
    pub title: String,
    pub body: String,
}

impl PrDraft {
    /// Markdown document written to `pr_docs/`.
    pub fn to_markdown(&self) -> String {
        format!("## {}\n\n{}\n", self.title, self.body)
    }
}

/// Remove a leading and trailing code-fence marker.
pub fn strip_code_fence(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// Recover up to `k` commit suggestions from a reply.
///
/// An empty result means the model replied but nothing usable was found.
pub fn extract_commit_messages(raw: &str, k: usize) -> Vec<CommitSuggestion> {
    let stripped = strip_code_fence(raw);
    let direct_error = match serde_json::from_str::<Value>(&stripped) {
        Ok(value) => match validate_commit_messages(&value) {
            Some(mut messages) => {
                messages.truncate(k);
                return messages;
            }
            None => "reply is not an array of {message} objects".to_string(),
        },
        Err(e) => e.to_string(),
    };

    if let Some(mut messages) = scan_spans(raw, '[', ']', validate_commit_messages) {
        debug!("Recovered commit messages from embedded array");
        messages.truncate(k);
        return messages;
    }

    error!("Failed to parse LLM response as JSON. Raw response was: {}", raw);
    error!("Error: {}", direct_error);
    Vec::new()
}

/// Recover a `{title, body}` object from a reply.
pub fn extract_pr_draft(raw: &str) -> Option<PrDraft> {
    let stripped = strip_code_fence(raw);
    let direct_error = match serde_json::from_str::<Value>(&stripped) {
        Ok(value) => match validate_pr_draft(&value) {
            Some(draft) => return Some(draft),
            None => "Missing fields".to_string(),
        },
        Err(e) => e.to_string(),
    };

    if let Some(draft) = scan_spans(raw, '{', '}', validate_pr_draft) {
        debug!("Recovered PR draft from embedded object");
        return Some(draft);
    }

    error!("Failed to parse PR JSON from LLM: {}", direct_error);
    debug!("Returned content: {}", raw);
    None
}

/// Every element must be an object with a non-empty string `message`.
fn validate_commit_messages(value: &Value) -> Option<Vec<CommitSuggestion>> {
    value
        .as_array()?
        .iter()
        .map(|item| {
            let message = item.get("message")?.as_str()?;
            (!message.is_empty()).then(|| CommitSuggestion {
                message: message.to_string(),
            })
        })
        .collect()
}

fn validate_pr_draft(value: &Value) -> Option<PrDraft> {
    let field = |name: &str| {
        value
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    Some(PrDraft {
        title: field("title")?,
        body: field("body")?,
    })
}

/// Try every `open` position; return the first balanced span that parses and
/// passes `accept`.
fn scan_spans<T>(
    text: &str,
    open: char,
    close: char,
    accept: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    for (start, _) in text.match_indices(open) {
        let Some(span) = balanced_span(&text[start..], open, close) else {
            continue;
        };
        if let Ok(value) = serde_json::from_str::<Value>(span)
            && let Some(found) = accept(&value)
        {
            return Some(found);
        }
    }
    None
}

/// Prefix of `text` (which starts with `open`) up to its matching `close`.
///
/// Tracks nesting depth while respecting JSON string literals and escapes, so
/// `["use ] carefully"]` is handled correctly.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (idx, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_json_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  [1]  "), "[1]");
    }

    #[test]
    fn direct_array_is_truncated_to_k() {
        let raw = r#"[{"message":"a"},{"message":"b"},{"message":"c"}]"#;
        let messages = extract_commit_messages(raw, 2);
        assert_eq!(
            messages,
            vec![
                CommitSuggestion { message: "a".into() },
                CommitSuggestion { message: "b".into() },
            ]
        );
    }

    #[test]
    fn array_inside_json_object_is_found_by_scan() {
        let raw = r#"{"suggestions": [{"message": "feat: x"}, {"message": "fix: y"}]}"#;
        let messages = extract_commit_messages(raw, 5);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].message, "fix: y");
    }

    #[test]
    fn invalid_element_rejects_direct_parse() {
        let raw = r#"[{"message":"ok"},{"message":""}]"#;
        assert!(extract_commit_messages(raw, 3).is_empty());
    }

    #[test]
    fn prose_without_json_yields_empty_list() {
        assert!(extract_commit_messages("Sorry, I cannot help with that.", 3).is_empty());
    }

    #[test]
    fn balanced_span_respects_strings() {
        let text = r#"["use ] carefully", [1]] tail"#;
        assert_eq!(balanced_span(text, '[', ']'), Some(r#"["use ] carefully", [1]]"#));
    }

    #[test]
    fn balanced_span_handles_escaped_quotes() {
        let text = r#"{"a": "say \"}\" now"} rest"#;
        assert_eq!(balanced_span(text, '{', '}'), Some(r#"{"a": "say \"}\" now"}"#));
    }

    #[test]
    fn balanced_span_unclosed_is_none() {
        assert_eq!(balanced_span("[[1]", '[', ']'), None);
    }

    #[test]
    fn pr_draft_direct_and_fenced() {
        let raw = "```json\n{\"title\": \"Add auth\", \"body\": \"Adds login.\"}\n```";
        let draft = extract_pr_draft(raw).unwrap();
        assert_eq!(draft.title, "Add auth");
        assert_eq!(draft.body, "Adds login.");
        assert_eq!(draft.to_markdown(), "## Add auth\n\nAdds login.\n");
    }

    #[test]
    fn pr_draft_missing_field_is_none() {
        assert_eq!(extract_pr_draft(r#"{"title": "only title"}"#), None);
        assert_eq!(extract_pr_draft(r#"{"title": "", "body": "b"}"#), None);
    }

    #[test]
    fn pr_draft_embedded_in_prose() {
        let raw = r#"Sure! Here is the draft: {"title": "Fix {edge} case", "body": "Handles {} input."} Let me know."#;
        let draft = extract_pr_draft(raw).unwrap();
        assert_eq!(draft.title, "Fix {edge} case");
    }

    #[test]
    fn pr_draft_skips_earlier_unrelated_object() {
        let raw = r#"Config {"x": 1} then {"title": "T", "body": "B"}"#;
        let draft = extract_pr_draft(raw).unwrap();
        assert_eq!(draft.title, "T");
    }
}
