//! Deterministic fast paths for simple command forms. These run before the
//! suggestion model is ever consulted; a match short-circuits the AI
//! entirely. Title casing is preserved — only the verbs are matched
//! case-insensitively.

use std::sync::LazyLock;

use regex::Regex;

/// A recognized local command, title-addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Delete { title: String },
    Rename { old: String, new: String },
    MarkDone { title: String },
}

static DELETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:delete|remove)\s+(.+)$").unwrap());
static RENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:rename|change|edit)\s+(.+?)\s+to\s+(.+)$").unwrap());
static MARK_AS_DONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^mark\s+(.+?)\s+(?:as\s+)?done$").unwrap());
static COMPLETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:complete|finish)\s+(.+)$").unwrap());

/// Try the shortcut grammar against raw instruction text. Returns `None`
/// for anything that needs the full AI pipeline.
pub fn parse_command(text: &str) -> Option<Command> {
    let text = text.trim();

    if let Some(caps) = DELETE.captures(text) {
        return Some(Command::Delete {
            title: caps[1].trim().to_string(),
        });
    }
    if let Some(caps) = RENAME.captures(text) {
        return Some(Command::Rename {
            old: caps[1].trim().to_string(),
            new: caps[2].trim().to_string(),
        });
    }
    if let Some(caps) = MARK_AS_DONE.captures(text) {
        return Some(Command::MarkDone {
            title: caps[1].trim().to_string(),
        });
    }
    if let Some(caps) = COMPLETE.captures(text) {
        return Some(Command::MarkDone {
            title: caps[1].trim().to_string(),
        });
    }
    None
}
