//! Integration tests for recovering structured data from model replies.

use gitai::llm::{CommitSuggestion, extract_commit_messages, extract_pr_draft};
use serde_json::json;

fn suggestions(n: usize) -> Vec<CommitSuggestion> {
    (0..n)
        .map(|i| CommitSuggestion {
            message: format!("feat: change number {}", i),
        })
        .collect()
}

#[test]
fn test_serialized_lists_parse_back() {
    for n in [0, 1, 5] {
        let expected = suggestions(n);
        let raw = serde_json::to_string(&expected).unwrap();
        assert_eq!(extract_commit_messages(&raw, n.max(1)), expected, "n = {}", n);
    }
}

#[test]
fn test_fenced_lists_parse_back() {
    for n in [0, 1, 5] {
        let expected = suggestions(n);
        let raw = format!(
            "```json\n{}\n```",
            serde_json::to_string_pretty(&expected).unwrap()
        );
        assert_eq!(extract_commit_messages(&raw, n.max(1)), expected, "n = {}", n);
    }
}

#[test]
fn test_list_is_truncated_to_requested_count() {
    let raw = serde_json::to_string(&suggestions(5)).unwrap();
    assert_eq!(extract_commit_messages(&raw, 3), suggestions(3));
}

#[test]
fn test_fenced_reply() {
    let raw = format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&suggestions(2)).unwrap()
    );
    assert_eq!(extract_commit_messages(&raw, 2), suggestions(2));
}

#[test]
fn test_prose_with_nested_arrays() {
    let raw = r#"Sure! Based on the diff [which touches 2 files], here are my picks:
[{"message": "feat: add [WIP] parser", "tags": ["a", ["b"]]}, {"message": "fix: escape \"]\" in output"}]
Hope this helps."#;

    let messages = extract_commit_messages(raw, 3);
    assert_eq!(
        messages,
        vec![
            CommitSuggestion {
                message: "feat: add [WIP] parser".into()
            },
            CommitSuggestion {
                message: "fix: escape \"]\" in output".into()
            },
        ]
    );
}

#[test]
fn test_object_wrapper_is_searched() {
    let raw = json!({"commits": [{"message": "docs: update readme"}]}).to_string();
    assert_eq!(
        extract_commit_messages(&raw, 3),
        vec![CommitSuggestion {
            message: "docs: update readme".into()
        }]
    );
}

#[test]
fn test_unusable_replies_yield_empty_list() {
    assert!(extract_commit_messages("", 3).is_empty());
    assert!(extract_commit_messages("I'm not sure what you mean.", 3).is_empty());
    assert!(extract_commit_messages(r#"[{"msg": "wrong key"}]"#, 3).is_empty());
    assert!(extract_commit_messages(r#"[{"message": "unterminated"}"#, 3).is_empty());
}

#[test]
fn test_pr_draft_from_fenced_and_prose_replies() {
    let fenced = "```json\n{\"title\": \"Add auth\", \"body\": \"- login\\n- logout\"}\n```";
    let draft = extract_pr_draft(fenced).unwrap();
    assert_eq!(draft.title, "Add auth");
    assert_eq!(draft.body, "- login\n- logout");

    let prose = "The PR: {\"title\": \"T\", \"body\": \"B with {braces}\"} -- done";
    let draft = extract_pr_draft(prose).unwrap();
    assert_eq!(draft.body, "B with {braces}");

    assert_eq!(extract_pr_draft("no json here"), None);
}
