use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::node::Level;

/// Low-level edit action, the tag of the reducer's instruction union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Add,
    Delete,
    Edit,
    Complete,
    SetTarget,
    Promote,
    Reorder,
}

/// Where an `add` lands relative to its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddMode {
    /// New root node in the level; path is ignored.
    Thread,
    /// New node inside the addressed node's steps.
    Child,
    /// New node immediately after the addressed node, same container.
    Sibling,
}

/// Reorder direction for the `reorder` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Top,
    Bottom,
}

/// A path-addressed mutation command, consumed by the reducer. Paths are
/// ephemeral: valid only against the exact forest snapshot they were
/// resolved from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditInstruction {
    pub action: EditAction,
    pub level: Level,
    #[serde(default)]
    pub path: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AddMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl EditInstruction {
    pub fn add_thread(level: Level, text: &str, target_date: Option<i64>) -> Self {
        EditInstruction {
            action: EditAction::Add,
            level,
            path: Vec::new(),
            mode: Some(AddMode::Thread),
            text: Some(text.to_string()),
            target_date,
            direction: None,
        }
    }

    pub fn add_child(level: Level, path: Vec<usize>, text: &str, target_date: Option<i64>) -> Self {
        EditInstruction {
            action: EditAction::Add,
            level,
            path,
            mode: Some(AddMode::Child),
            text: Some(text.to_string()),
            target_date,
            direction: None,
        }
    }

    pub fn delete(level: Level, path: Vec<usize>) -> Self {
        EditInstruction {
            action: EditAction::Delete,
            level,
            path,
            mode: None,
            text: None,
            target_date: None,
            direction: None,
        }
    }

    pub fn edit(level: Level, path: Vec<usize>, text: &str) -> Self {
        EditInstruction {
            action: EditAction::Edit,
            level,
            path,
            mode: None,
            text: Some(text.to_string()),
            target_date: None,
            direction: None,
        }
    }

    pub fn complete(level: Level, path: Vec<usize>) -> Self {
        EditInstruction {
            action: EditAction::Complete,
            level,
            path,
            mode: None,
            text: None,
            target_date: None,
            direction: None,
        }
    }
}

/// High-level suggestion action. The model is only ever asked for these
/// three; everything else is coerced during sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionAction {
    Add,
    Delete,
    Edit,
}

/// What kind of node a suggestion talks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Thread,
    Step,
    Substep,
}

/// A title-addressed mutation command, the shape the language model is
/// asked to emit. Untrusted: always built through [`Suggestion::sanitize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub action: SuggestionAction,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_title: Option<String>,
    #[serde(default, rename = "targetDate", skip_serializing_if = "Option::is_none")]
    pub target_date: Option<i64>,
}

impl Suggestion {
    /// Coerce one element of an untrusted model response into a usable
    /// suggestion. Unknown actions collapse to `add`, unknown kinds to
    /// `thread`, titles are trimmed, and entries carrying neither a title
    /// nor an old title are dropped.
    pub fn sanitize(value: &Value) -> Option<Suggestion> {
        let obj = value.as_object()?;

        let action = match obj.get("action").and_then(Value::as_str) {
            Some("delete") => SuggestionAction::Delete,
            Some("edit") => SuggestionAction::Edit,
            _ => SuggestionAction::Add,
        };
        let kind = match obj.get("type").and_then(Value::as_str) {
            Some("step") => SuggestionKind::Step,
            Some("substep") => SuggestionKind::Substep,
            _ => SuggestionKind::Thread,
        };

        let trimmed = |key: &str| -> Option<String> {
            obj.get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let title = trimmed("title").unwrap_or_default();
        let old_title = trimmed("old_title");
        let parent_title = trimmed("parent_title");
        let target_date = obj.get("targetDate").and_then(Value::as_i64);

        if title.is_empty() && old_title.is_none() {
            return None;
        }

        Some(Suggestion {
            action,
            kind,
            title,
            old_title,
            parent_title,
            target_date,
        })
    }
}
