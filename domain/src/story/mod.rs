//! Story list ingestion
//!
//! Story lists arrive as loosely shaped JSON (usually an imported file). They
//! are validated and normalized into [`StoryDraft`]s here so the session state
//! machine only ever sees well-formed stories.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest story title accepted, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

const TITLE_KEYS: [&str; 4] = ["title", "name", "nom", "titre"];
const CONTENT_KEYS: [&str; 4] = ["content", "description", "desc", "contenu"];

/// A validated story, not yet attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDraft {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl StoryDraft {
    pub fn new(title: impl AsRef<str>, content: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DomainError::invalid("story title cannot be empty"));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(DomainError::invalid(format!(
                "story title longer than {} characters",
                MAX_TITLE_CHARS
            )));
        }
        Ok(Self {
            title: title.to_string(),
            content: content.into(),
        })
    }
}

/// Normalize an imported story list.
///
/// Accepted shapes:
/// - an array of objects (`title`/`name`/`nom`, optional `content`/`description`)
/// - an array of strings (each string is a title)
/// - an object wrapping such an array under `stories`
/// - an object whose values are story entries, taken in key order
///
/// # Example
///
/// ```
/// use poker_domain::story::parse_story_list;
///
/// let stories = parse_story_list(&serde_json::json!([
///     {"title": "Login page", "description": "OAuth flow"},
///     "Password reset",
/// ]))
/// .unwrap();
/// assert_eq!(stories.len(), 2);
/// assert_eq!(stories[0].content, "OAuth flow");
/// assert_eq!(stories[1].title, "Password reset");
/// ```
pub fn parse_story_list(value: &Value) -> Result<Vec<StoryDraft>, DomainError> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match map.get("stories") {
            Some(inner) => return parse_story_list(inner),
            None => map.values().collect(),
        },
        _ => {
            return Err(DomainError::invalid(
                "story list must be a JSON array or object",
            ));
        }
    };

    if entries.is_empty() {
        return Err(DomainError::invalid("story list is empty"));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            parse_entry(entry)
                .map_err(|e| DomainError::invalid(format!("story #{}: {}", i + 1, message_of(e))))
        })
        .collect()
}

fn parse_entry(entry: &Value) -> Result<StoryDraft, DomainError> {
    match entry {
        Value::String(title) => StoryDraft::new(title, String::new()),
        Value::Object(fields) => {
            let title = match TITLE_KEYS.iter().find_map(|key| fields.get(*key)) {
                Some(Value::String(title)) => title,
                Some(_) => return Err(DomainError::invalid("title must be a string")),
                None => return Err(DomainError::invalid("missing title")),
            };
            let content = match CONTENT_KEYS.iter().find_map(|key| fields.get(*key)) {
                Some(Value::String(content)) => content.clone(),
                Some(Value::Null) | None => String::new(),
                Some(_) => return Err(DomainError::invalid("content must be a string")),
            };
            StoryDraft::new(title, content)
        }
        _ => Err(DomainError::invalid("expected an object or a string")),
    }
}

fn message_of(error: DomainError) -> String {
    match error {
        DomainError::InvalidInput(message) => message,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_objects() {
        let stories = parse_story_list(&json!([
            {"title": "A", "content": "first"},
            {"nom": "B"},
            {"name": " C ", "description": null}
        ]))
        .unwrap();

        assert_eq!(
            stories,
            vec![
                StoryDraft::new("A", "first").unwrap(),
                StoryDraft::new("B", "").unwrap(),
                StoryDraft::new("C", "").unwrap(),
            ]
        );
    }

    #[test]
    fn test_keyed_object_in_key_order() {
        let stories = parse_story_list(&json!({
            "story2": {"nom": "Feature B"},
            "story1": {"nom": "Feature A"}
        }))
        .unwrap();
        let titles: Vec<_> = stories.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Feature A", "Feature B"]);
    }

    #[test]
    fn test_wrapped_list() {
        let stories = parse_story_list(&json!({"stories": ["one", "two"]})).unwrap();
        assert_eq!(stories.len(), 2);
    }

    #[test]
    fn test_rejects_malformed_entries() {
        let err = parse_story_list(&json!([{"title": "ok"}, {"points": 3}])).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidInput("story #2: missing title".to_string())
        );

        assert!(parse_story_list(&json!([{"title": 42}])).is_err());
        assert!(parse_story_list(&json!([{"title": "x", "content": 1}])).is_err());
        assert!(parse_story_list(&json!(["   "])).is_err());
        assert!(parse_story_list(&json!([7])).is_err());
    }

    #[test]
    fn test_rejects_empty_and_scalars() {
        assert!(parse_story_list(&json!([])).is_err());
        assert!(parse_story_list(&json!({})).is_err());
        assert!(parse_story_list(&json!("stories")).is_err());
    }
}
