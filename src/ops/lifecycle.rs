//! Caller-level node lifecycle: completion toggling with repeat
//! rescheduling, target-date attachment, and manual adds with date
//! inference from the entered text.

use chrono::{DateTime, Local};

use crate::model::config::InsertPolicy;
use crate::model::node::{Forest, Level, TaskNode};
use crate::ops::addressing;
use crate::parse::when;

/// Flip completion on the addressed node. A node with a `repeat` schedule
/// is never marked done here; instead its target date moves to the next
/// weekly occurrence and `completed` is forced off. Invalid paths change
/// nothing.
pub fn toggle_completion(
    forest: &Forest,
    level: Level,
    path: &[usize],
    now: DateTime<Local>,
) -> Forest {
    let mut updated = forest.clone();
    let Some(node) = addressing::get_node_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    match node.repeat {
        Some(repeat) => {
            node.target_date =
                Some(when::next_weekly_at(repeat.weekday, repeat.hour, repeat.minute, now));
            node.completed = false;
        }
        None => node.completed = !node.completed,
    }
    updated
}

/// Set or clear the target date on the addressed node. Clearing also
/// drops the all-day flag.
pub fn set_target_date(
    forest: &Forest,
    level: Level,
    path: &[usize],
    ts: Option<i64>,
    all_day: bool,
) -> Forest {
    let mut updated = forest.clone();
    let Some(node) = addressing::get_node_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    node.target_date = ts;
    node.all_day = ts.map(|_| all_day);
    updated
}

/// Manual add from typed text. The target date and all-day flag are
/// inferred from the text itself. With a parent address the node becomes a
/// child there; without one (or when the parent no longer resolves) it
/// becomes a thread in `default_level` — input is never dropped.
pub fn add_item(
    forest: &Forest,
    text: &str,
    parent: Option<(Level, &[usize])>,
    default_level: Level,
    policy: InsertPolicy,
    now: DateTime<Local>,
) -> Forest {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return forest.clone();
    }
    let inferred = when::infer_target_date(trimmed, now);
    let node = TaskNode::new(trimmed, inferred.ts, inferred.all_day);

    let mut updated = forest.clone();
    let container = match parent {
        Some((level, path)) => match addressing::get_node_mut(&mut updated, level, path) {
            Some(parent_node) => &mut parent_node.steps,
            None => updated.level_mut(default_level),
        },
        None => updated.level_mut(default_level),
    };
    match policy {
        InsertPolicy::Front => container.insert(0, node),
        InsertPolicy::Back => container.push(node),
    }
    updated
}
