//! Tier 1: embedded-state extraction.
//!
//! The site's rendering framework inlines a serialized entity cache into the
//! page as an object literal assigned to a well-known global. When present
//! this is authoritative: the entries are structured data, not markup. Post
//! statistics entries (which carry both view and read counts) are joined to
//! their companion post entries (which carry the title) by shared id.

use std::collections::HashMap;

use serde_json::Value;

use scribestats_core::numbers::parse_count;
use scribestats_core::{ArticleRecord, Earnings};

const STATE_GLOBAL: &str = "__APOLLO_STATE__";

const POST_KEY_PREFIX: &str = "Post:";
const STATS_KEY_MARKER: &str = "PostStats:";

pub(crate) fn extract(html: &str) -> Option<Vec<ArticleRecord>> {
    let state = find_state_blob(html)?;
    let map = state.as_object()?;

    let mut titles: HashMap<String, String> = HashMap::new();
    for (key, value) in map {
        if let Some(id) = key.strip_prefix(POST_KEY_PREFIX) {
            if let Some(title) = value.get("title").and_then(Value::as_str) {
                titles.insert(id.to_string(), title.to_string());
            }
        }
    }

    let mut records = Vec::new();
    for (key, value) in map {
        let Some((_, key_id)) = key.split_once(STATS_KEY_MARKER) else {
            continue;
        };
        let Some(obj) = value.as_object() else {
            continue;
        };
        // Only entries shaped like post statistics qualify: both fields
        // must exist, even if one fails to parse.
        let (Some(views_raw), Some(reads_raw)) = (obj.get("views"), obj.get("reads")) else {
            continue;
        };

        let id = obj
            .get("postId")
            .and_then(Value::as_str)
            .map(ToString::to_string)
            .unwrap_or_else(|| key_id.to_string());
        let title = titles.get(&id).cloned().unwrap_or_default();

        let record = ArticleRecord {
            id: Some(id),
            title,
            date: None,
            views: json_count(views_raw),
            reads: json_count(reads_raw),
            fans: 0,
            claps: 0,
            comments: 0,
            earnings: state_earnings(obj.get("earnings")),
            source: "embedded_state".to_string(),
        };
        if record.is_valid() {
            records.push(record);
        }
    }

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// Locate `__APOLLO_STATE__ = {...}` in page source and parse the balanced
/// object literal that follows the assignment.
fn find_state_blob(html: &str) -> Option<Value> {
    let start = html.find(STATE_GLOBAL)?;
    let after = &html[start + STATE_GLOBAL.len()..];
    let eq = after.find('=')?;
    if !after[..eq].trim().is_empty() {
        return None;
    }
    let blob = extract_balanced_object(after[eq + 1..].trim_start())?;
    serde_json::from_str(blob).ok()
}

/// Return the leading balanced `{...}` of `s`, honoring JSON string escapes.
/// Returns `None` when `s` does not start with `{` or the braces never close.
fn extract_balanced_object(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Counts in the state blob appear as JSON numbers or numeric strings.
fn json_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(parse_count))
}

/// Earnings appear either as a pre-formatted string or as `{amount: ...}`.
fn state_earnings(value: Option<&Value>) -> Earnings {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Earnings::Amount(s.clone()),
        Some(other) => match other.get("amount") {
            Some(Value::Number(n)) => Earnings::Amount(format!("${n}")),
            Some(Value::String(s)) if !s.is_empty() => Earnings::Amount(format!("${s}")),
            _ => Earnings::Unavailable,
        },
        None => Earnings::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(blob: &str) -> String {
        format!("<html><body><script>window.__APOLLO_STATE__ = {blob};</script></body></html>")
    }

    #[test]
    fn joins_stats_to_titles_by_shared_id() {
        let html = page(
            r#"{
                "Post:a1": {"title": "First Story"},
                "Post:b2": {"title": "Second Story"},
                "PostStats:a1": {"postId": "a1", "views": 100, "reads": 40},
                "PostStats:b2": {"views": "250", "reads": "10"}
            }"#,
        );
        let mut records = extract(&html).unwrap();
        records.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "First Story");
        assert_eq!(records[0].views, Some(100));
        assert_eq!(records[0].reads, Some(40));
        assert_eq!(records[1].id.as_deref(), Some("b2"));
        assert_eq!(records[1].views, Some(250));
    }

    #[test]
    fn entries_missing_either_count_field_are_not_stats() {
        let html = page(
            r#"{
                "Post:a1": {"title": "First Story"},
                "PostStats:a1": {"views": 100}
            }"#,
        );
        assert!(extract(&html).is_none());
    }

    #[test]
    fn stats_without_a_companion_title_are_discarded() {
        let html = page(r#"{"PostStats:orphan": {"views": 5, "reads": 1}}"#);
        assert!(extract(&html).is_none());
    }

    #[test]
    fn earnings_string_and_amount_object_are_both_read() {
        let html = page(
            r#"{
                "Post:a1": {"title": "Paid Story"},
                "Post:b2": {"title": "Object Story"},
                "PostStats:a1": {"views": 1, "reads": 1, "earnings": "$3.50"},
                "PostStats:b2": {"views": 1, "reads": 1, "earnings": {"amount": 12.5}}
            }"#,
        );
        let mut records = extract(&html).unwrap();
        records.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(records[1].earnings, Earnings::Amount("$3.50".to_string()));
        assert_eq!(records[0].earnings, Earnings::Amount("$12.5".to_string()));
    }

    #[test]
    fn absent_global_is_a_clean_miss() {
        assert!(extract("<html><body>no state here</body></html>").is_none());
    }

    #[test]
    fn malformed_blob_is_a_clean_miss() {
        let html = "<script>__APOLLO_STATE__ = {broken";
        assert!(extract(html).is_none());
    }

    #[test]
    fn balanced_object_honors_nested_braces_and_strings() {
        let s = r#"{"a": {"b": "}"}, "c": 1} trailing"#;
        assert_eq!(
            extract_balanced_object(s),
            Some(r#"{"a": {"b": "}"}, "c": 1}"#)
        );
    }

    #[test]
    fn balanced_object_rejects_unclosed_input() {
        assert_eq!(extract_balanced_object(r#"{"a": 1"#), None);
        assert_eq!(extract_balanced_object("[1, 2]"), None);
    }
}
