//! Path-based navigation and reordering over the forest.
//!
//! Paths are index sequences: the first hop indexes the level's root array,
//! every later hop indexes the `.steps` of the node reached so far. All
//! mutating operations are copy-on-write and total — an invalid path returns
//! the input forest unchanged, never a panic.

use crate::model::node::{Forest, Level, TaskNode};

/// Walk a path down one level's roots. Returns `None` when any hop is out
/// of range.
pub fn get_node<'a>(forest: &'a Forest, level: Level, path: &[usize]) -> Option<&'a TaskNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = forest.level(level).get(first)?;
    for &idx in rest {
        node = node.steps.get(idx)?;
    }
    Some(node)
}

pub(crate) fn get_node_mut<'a>(
    forest: &'a mut Forest,
    level: Level,
    path: &[usize],
) -> Option<&'a mut TaskNode> {
    let (&first, rest) = path.split_first()?;
    let mut node = forest.level_mut(level).get_mut(first)?;
    for &idx in rest {
        node = node.steps.get_mut(idx)?;
    }
    Some(node)
}

/// The container holding the addressed node, plus its index in that
/// container. For path length 1 the container is the level's root array.
pub fn parent_slot<'a>(
    forest: &'a Forest,
    level: Level,
    path: &[usize],
) -> Option<(&'a [TaskNode], usize)> {
    let (&last, rest) = path.split_last()?;
    let container: &[TaskNode] = if rest.is_empty() {
        forest.level(level)
    } else {
        &get_node(forest, level, rest)?.steps
    };
    if last >= container.len() {
        return None;
    }
    Some((container, last))
}

pub(crate) fn parent_slot_mut<'a>(
    forest: &'a mut Forest,
    level: Level,
    path: &[usize],
) -> Option<(&'a mut Vec<TaskNode>, usize)> {
    let (&last, rest) = path.split_last()?;
    let container: &mut Vec<TaskNode> = if rest.is_empty() {
        forest.level_mut(level)
    } else {
        &mut get_node_mut(forest, level, rest)?.steps
    };
    if last >= container.len() {
        return None;
    }
    Some((container, last))
}

/// True iff the node resolves and is not already first among its siblings.
pub fn can_move_up(forest: &Forest, level: Level, path: &[usize]) -> bool {
    match parent_slot(forest, level, path) {
        Some((_, index)) => index > 0,
        None => false,
    }
}

/// True iff the node resolves and is not already last among its siblings.
pub fn can_move_down(forest: &Forest, level: Level, path: &[usize]) -> bool {
    match parent_slot(forest, level, path) {
        Some((container, index)) => index + 1 < container.len(),
        None => false,
    }
}

/// One-position move within the sibling container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Up,
    Down,
}

/// Swap the addressed node with its immediate neighbor. No-op at a
/// boundary or for an invalid path.
pub fn move_by(forest: &Forest, level: Level, path: &[usize], dir: MoveDir) -> Forest {
    let mut updated = forest.clone();
    let Some((container, index)) = parent_slot_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    let target = match dir {
        MoveDir::Up if index > 0 => index - 1,
        MoveDir::Down if index + 1 < container.len() => index + 1,
        _ => return forest.clone(),
    };
    container.swap(index, target);
    updated
}

/// Relocate the addressed node to the front of its container.
pub fn move_to_top(forest: &Forest, level: Level, path: &[usize]) -> Forest {
    let mut updated = forest.clone();
    let Some((container, index)) = parent_slot_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    let node = container.remove(index);
    container.insert(0, node);
    updated
}

/// Relocate the addressed node to the end of its container.
pub fn move_to_bottom(forest: &Forest, level: Level, path: &[usize]) -> Forest {
    let mut updated = forest.clone();
    let Some((container, index)) = parent_slot_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    let node = container.remove(index);
    container.push(node);
    updated
}

/// Promote a nested node to a top-level thread in the same level. The
/// node's own subtree travels unchanged. No-op for root nodes (path
/// length ≤ 1) and invalid paths.
pub fn promote(forest: &Forest, level: Level, path: &[usize]) -> Forest {
    if path.len() <= 1 {
        return forest.clone();
    }
    let mut updated = forest.clone();
    let Some((container, index)) = parent_slot_mut(&mut updated, level, path) else {
        return forest.clone();
    };
    let node = container.remove(index);
    updated.level_mut(level).insert(0, node);
    updated
}
