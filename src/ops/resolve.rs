//! Title resolution: turning title-addressed suggestions into the
//! reducer's path-addressed instructions.
//!
//! Titles are matched on normalized text (trim + casefold). Duplicate
//! titles are an accepted ambiguity — lookups take the first match in a
//! fixed traversal order (levels in declaration order, roots in order,
//! depth first) so the same forest always resolves the same way.

use crate::model::config::InsertPolicy;
use crate::model::instruction::{
    EditInstruction, Suggestion, SuggestionAction, SuggestionKind,
};
use crate::model::node::{Forest, Level, TaskNode};
use crate::ops::reducer::{self, ApplyOptions};

pub fn normalize_title(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Index of the first root node in `threads` whose normalized text equals
/// `title`.
pub fn find_thread_index(threads: &[TaskNode], title: &str) -> Option<usize> {
    let needle = normalize_title(title);
    if needle.is_empty() {
        return None;
    }
    threads.iter().position(|t| normalize_title(&t.text) == needle)
}

/// Full-forest search for a node by normalized title. Deterministic
/// preorder walk across all three levels.
pub fn find_path_by_title(forest: &Forest, title: &str) -> Option<(Level, Vec<usize>)> {
    let needle = normalize_title(title);
    if needle.is_empty() {
        return None;
    }
    for level in Level::ALL {
        if let Some(path) = find_in_list(forest.level(level), &needle, &mut Vec::new()) {
            return Some((level, path));
        }
    }
    None
}

fn find_in_list(nodes: &[TaskNode], needle: &str, prefix: &mut Vec<usize>) -> Option<Vec<usize>> {
    for (i, node) in nodes.iter().enumerate() {
        prefix.push(i);
        if normalize_title(&node.text) == needle {
            let found = prefix.clone();
            prefix.pop();
            return Some(found);
        }
        if let Some(found) = find_in_list(&node.steps, needle, prefix) {
            prefix.pop();
            return Some(found);
        }
        prefix.pop();
    }
    None
}

/// Map one high-level suggestion into zero or more low-level instructions
/// against the given forest snapshot.
///
/// Callers applying a batch must adapt each suggestion against the forest
/// that resulted from the previous one, so later title lookups see earlier
/// effects. When a `step`'s parent thread is missing, the adapter emits
/// the thread creation and then re-resolves the parent by title against a
/// scratch application of that creation — the parent's landing index is
/// the insert policy's business, not ours.
pub fn adapt_suggestion(
    forest: &Forest,
    suggestion: &Suggestion,
    default_level: Level,
    policy: InsertPolicy,
) -> Vec<EditInstruction> {
    match suggestion.action {
        SuggestionAction::Add => adapt_add(forest, suggestion, default_level, policy),
        SuggestionAction::Delete => {
            let title = if suggestion.title.is_empty() {
                suggestion.old_title.as_deref().unwrap_or("")
            } else {
                &suggestion.title
            };
            match find_path_by_title(forest, title) {
                Some((level, path)) => vec![EditInstruction::delete(level, path)],
                None => Vec::new(),
            }
        }
        SuggestionAction::Edit => {
            let new_title = suggestion.title.trim();
            if new_title.is_empty() {
                return Vec::new();
            }
            let old_title = suggestion.old_title.as_deref().unwrap_or(new_title);
            match find_path_by_title(forest, old_title) {
                Some((level, path)) => vec![EditInstruction::edit(level, path, new_title)],
                None => Vec::new(),
            }
        }
    }
}

fn adapt_add(
    forest: &Forest,
    suggestion: &Suggestion,
    default_level: Level,
    policy: InsertPolicy,
) -> Vec<EditInstruction> {
    let title = &suggestion.title;
    let target = suggestion.target_date;

    match suggestion.kind {
        SuggestionKind::Thread => {
            vec![EditInstruction::add_thread(default_level, title, target)]
        }
        SuggestionKind::Step => {
            let parent_title = suggestion.parent_title.as_deref().unwrap_or("");
            let mut out = Vec::new();

            let mut index = find_thread_index(forest.level(default_level), parent_title);
            if index.is_none() && !parent_title.trim().is_empty() {
                // Create the missing parent, then find where it actually
                // landed instead of assuming the front.
                let create = EditInstruction::add_thread(default_level, parent_title, None);
                let scratch = reducer::apply_instruction(
                    forest,
                    &create,
                    &ApplyOptions { insert: policy, ..Default::default() },
                );
                index = find_thread_index(scratch.level(default_level), parent_title);
                out.push(create);
            }

            if let Some(i) = index {
                out.push(EditInstruction::add_child(default_level, vec![i], title, target));
            }
            out
        }
        SuggestionKind::Substep => match find_path_by_title(
            forest,
            suggestion.parent_title.as_deref().unwrap_or(""),
        ) {
            Some((level, path)) => {
                vec![EditInstruction::add_child(level, path, title, target)]
            }
            // unresolvable parent: keep the user's input as its own
            // thread rather than dropping it
            None => vec![EditInstruction::add_thread(default_level, title, target)],
        },
    }
}

// ---------------------------------------------------------------------------
// By-title shortcuts
// ---------------------------------------------------------------------------

/// Delete the first node matching `title`. Returns the new forest and
/// whether anything changed.
pub fn delete_by_title(forest: &Forest, title: &str) -> (Forest, bool) {
    match find_path_by_title(forest, title) {
        Some((level, path)) => {
            let instr = EditInstruction::delete(level, path);
            (
                reducer::apply_instruction(forest, &instr, &ApplyOptions::default()),
                true,
            )
        }
        None => (forest.clone(), false),
    }
}

/// Rename the first node matching `old`. Blank new titles change nothing.
pub fn rename_by_title(forest: &Forest, old: &str, new: &str) -> (Forest, bool) {
    if new.trim().is_empty() {
        return (forest.clone(), false);
    }
    match find_path_by_title(forest, old) {
        Some((level, path)) => {
            let instr = EditInstruction::edit(level, path, new);
            (
                reducer::apply_instruction(forest, &instr, &ApplyOptions::default()),
                true,
            )
        }
        None => (forest.clone(), false),
    }
}

/// Mark the first node matching `title` as completed.
pub fn mark_done_by_title(forest: &Forest, title: &str) -> (Forest, bool) {
    match find_path_by_title(forest, title) {
        Some((level, path)) => {
            let instr = EditInstruction::complete(level, path);
            (
                reducer::apply_instruction(forest, &instr, &ApplyOptions::default()),
                true,
            )
        }
        None => (forest.clone(), false),
    }
}
