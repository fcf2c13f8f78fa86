//! The edit-instruction reducer: applies one low-level, path-addressed
//! instruction to a forest snapshot and returns a new snapshot.
//!
//! The reducer is the trust boundary for model-supplied instructions. It
//! never fails: anything that is not fully addressable — stale path, bad
//! index, missing mode or direction — leaves the forest unchanged.

use crate::model::config::InsertPolicy;
use crate::model::instruction::{AddMode, Direction, EditAction, EditInstruction};
use crate::model::node::{Forest, Level, TaskNode};
use crate::ops::addressing::{self, MoveDir};

/// Caller-supplied context for one application.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Target date for new nodes when the instruction carries none,
    /// typically inferred from the originating text.
    pub fallback_target: Option<i64>,
    pub fallback_all_day: Option<bool>,
    /// Where new nodes land in their container.
    pub insert: InsertPolicy,
}

fn insert_node(container: &mut Vec<TaskNode>, node: TaskNode, policy: InsertPolicy) {
    match policy {
        InsertPolicy::Front => container.insert(0, node),
        InsertPolicy::Back => container.push(node),
    }
}

/// Apply a single instruction, copy-on-write.
pub fn apply_instruction(
    forest: &Forest,
    instr: &EditInstruction,
    opts: &ApplyOptions,
) -> Forest {
    match instr.action {
        EditAction::Add => apply_add(forest, instr, opts),
        EditAction::Delete => apply_delete(forest, instr),
        EditAction::Edit => apply_edit(forest, instr),
        EditAction::Complete => apply_complete(forest, instr),
        EditAction::SetTarget => apply_set_target(forest, instr),
        EditAction::Promote => addressing::promote(forest, instr.level, &instr.path),
        EditAction::Reorder => apply_reorder(forest, instr),
    }
}

fn apply_add(forest: &Forest, instr: &EditInstruction, opts: &ApplyOptions) -> Forest {
    let text = instr.text.as_deref().unwrap_or("");
    let (target, all_day) = match instr.target_date {
        Some(ts) => (Some(ts), None),
        None => (opts.fallback_target, opts.fallback_all_day),
    };
    let node = TaskNode::new(text, target, all_day);

    let mut updated = forest.clone();
    // absent mode means a plain thread add, matching what loose callers send
    match instr.mode.unwrap_or(AddMode::Thread) {
        AddMode::Thread => {
            insert_node(updated.level_mut(instr.level), node, opts.insert);
            updated
        }
        AddMode::Child => {
            let Some(parent) = addressing::get_node_mut(&mut updated, instr.level, &instr.path)
            else {
                return forest.clone();
            };
            insert_node(&mut parent.steps, node, opts.insert);
            updated
        }
        AddMode::Sibling => {
            let Some((container, index)) =
                addressing::parent_slot_mut(&mut updated, instr.level, &instr.path)
            else {
                return forest.clone();
            };
            container.insert(index + 1, node);
            updated
        }
    }
}

fn apply_delete(forest: &Forest, instr: &EditInstruction) -> Forest {
    let mut updated = forest.clone();
    let Some((container, index)) =
        addressing::parent_slot_mut(&mut updated, instr.level, &instr.path)
    else {
        return forest.clone();
    };
    // the subtree goes with it
    container.remove(index);
    updated
}

fn apply_edit(forest: &Forest, instr: &EditInstruction) -> Forest {
    let text = instr.text.as_deref().map(str::trim).unwrap_or("");
    if text.is_empty() {
        return forest.clone();
    }
    let mut updated = forest.clone();
    let Some(node) = addressing::get_node_mut(&mut updated, instr.level, &instr.path) else {
        return forest.clone();
    };
    node.text = text.to_string();
    updated
}

fn apply_complete(forest: &Forest, instr: &EditInstruction) -> Forest {
    let mut updated = forest.clone();
    let Some(node) = addressing::get_node_mut(&mut updated, instr.level, &instr.path) else {
        return forest.clone();
    };
    // idempotent set, not a toggle; toggling (and repeat rescheduling)
    // lives in ops::lifecycle
    node.completed = true;
    updated
}

fn apply_set_target(forest: &Forest, instr: &EditInstruction) -> Forest {
    let mut updated = forest.clone();
    let Some(node) = addressing::get_node_mut(&mut updated, instr.level, &instr.path) else {
        return forest.clone();
    };
    node.target_date = instr.target_date;
    if instr.target_date.is_none() {
        node.all_day = None;
    }
    updated
}

fn apply_reorder(forest: &Forest, instr: &EditInstruction) -> Forest {
    match instr.direction {
        Some(Direction::Up) => addressing::move_by(forest, instr.level, &instr.path, MoveDir::Up),
        Some(Direction::Down) => {
            addressing::move_by(forest, instr.level, &instr.path, MoveDir::Down)
        }
        Some(Direction::Top) => addressing::move_to_top(forest, instr.level, &instr.path),
        Some(Direction::Bottom) => addressing::move_to_bottom(forest, instr.level, &instr.path),
        None => forest.clone(),
    }
}

/// Parse and apply an untrusted JSON instruction. Anything that doesn't
/// deserialize into the instruction union is a no-op.
pub fn apply_json_instruction(
    forest: &Forest,
    raw: &serde_json::Value,
    opts: &ApplyOptions,
) -> Forest {
    match serde_json::from_value::<EditInstruction>(raw.clone()) {
        Ok(instr) => apply_instruction(forest, &instr, opts),
        Err(err) => {
            tracing::debug!(%err, "dropping malformed instruction");
            forest.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::instruction::{Direction, EditAction};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(text: &str, steps: Vec<TaskNode>) -> TaskNode {
        let mut n = TaskNode::new(text, None, None);
        n.steps = steps;
        n
    }

    fn sample_forest() -> Forest {
        Forest {
            execution: vec![
                node("Boat", vec![node("Sink", vec![]), node("Hull", vec![])]),
                node("Laptop", vec![]),
            ],
            baseline: vec![node("Sleep", vec![])],
            ..Default::default()
        }
    }

    fn opts() -> ApplyOptions {
        ApplyOptions::default()
    }

    // --- add ---

    #[test]
    fn add_thread_front_by_default() {
        let forest = sample_forest();
        let instr = EditInstruction::add_thread(Level::Execution, "Car", None);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].text, "Car");
        assert_eq!(updated.execution.len(), 3);
        // input untouched
        assert_eq!(forest.execution.len(), 2);
    }

    #[test]
    fn add_thread_back_policy() {
        let forest = sample_forest();
        let instr = EditInstruction::add_thread(Level::Execution, "Car", None);
        let updated = apply_instruction(
            &forest,
            &instr,
            &ApplyOptions { insert: InsertPolicy::Back, ..Default::default() },
        );
        assert_eq!(updated.execution.last().unwrap().text, "Car");
    }

    #[test]
    fn add_child_under_existing_node() {
        let forest = sample_forest();
        let instr = EditInstruction::add_child(Level::Execution, vec![0, 0], "Buy connector", None);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].steps[0].steps[0].text, "Buy connector");
    }

    #[test]
    fn add_child_invalid_parent_is_noop() {
        let forest = sample_forest();
        let instr = EditInstruction::add_child(Level::Execution, vec![9], "Lost", None);
        assert_eq!(apply_instruction(&forest, &instr, &opts()), forest);
    }

    #[test]
    fn add_sibling_inserts_after() {
        let forest = sample_forest();
        let mut instr = EditInstruction::add_thread(Level::Execution, "Mast", None);
        instr.mode = Some(AddMode::Sibling);
        instr.path = vec![0, 0];
        let updated = apply_instruction(&forest, &instr, &opts());
        let steps: Vec<&str> = updated.execution[0].steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(steps, vec!["Sink", "Mast", "Hull"]);
    }

    #[test]
    fn add_uses_instruction_target_then_fallback() {
        let forest = sample_forest();
        let instr = EditInstruction::add_thread(Level::Execution, "Car", Some(42));
        let updated = apply_instruction(
            &forest,
            &instr,
            &ApplyOptions { fallback_target: Some(7), ..Default::default() },
        );
        assert_eq!(updated.execution[0].target_date, Some(42));

        let instr = EditInstruction::add_thread(Level::Execution, "Car", None);
        let updated = apply_instruction(
            &forest,
            &instr,
            &ApplyOptions {
                fallback_target: Some(7),
                fallback_all_day: Some(true),
                ..Default::default()
            },
        );
        assert_eq!(updated.execution[0].target_date, Some(7));
        assert_eq!(updated.execution[0].all_day, Some(true));
    }

    // --- delete ---

    #[test]
    fn delete_removes_subtree() {
        let forest = sample_forest();
        let instr = EditInstruction::delete(Level::Execution, vec![0]);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution.len(), 1);
        assert_eq!(updated.execution[0].text, "Laptop");
    }

    #[test]
    fn add_then_delete_restores_structure() {
        let forest = sample_forest();
        let add = EditInstruction::add_thread(Level::Execution, "Temp", None);
        let added = apply_instruction(&forest, &add, &opts());
        let del = EditInstruction::delete(Level::Execution, vec![0]);
        let restored = apply_instruction(&added, &del, &opts());
        assert_eq!(restored, forest);
    }

    #[test]
    fn delete_invalid_path_is_noop() {
        let forest = sample_forest();
        for path in [vec![], vec![9], vec![0, 5], vec![1, 0, 0]] {
            let instr = EditInstruction::delete(Level::Execution, path);
            assert_eq!(apply_instruction(&forest, &instr, &opts()), forest);
        }
    }

    // --- edit ---

    #[test]
    fn edit_replaces_text_only() {
        let forest = sample_forest();
        let instr = EditInstruction::edit(Level::Execution, vec![0, 0], "  Kitchen sink  ");
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].steps[0].text, "Kitchen sink");
        assert_eq!(updated.execution[0].steps[0].target_date, None);
    }

    #[test]
    fn edit_blank_text_is_noop() {
        let forest = sample_forest();
        let instr = EditInstruction::edit(Level::Execution, vec![0], "   ");
        assert_eq!(apply_instruction(&forest, &instr, &opts()), forest);
    }

    // --- complete ---

    #[test]
    fn complete_is_idempotent_set() {
        let forest = sample_forest();
        let instr = EditInstruction::complete(Level::Baseline, vec![0]);
        let once = apply_instruction(&forest, &instr, &opts());
        assert!(once.baseline[0].completed);
        let twice = apply_instruction(&once, &instr, &opts());
        assert!(twice.baseline[0].completed);
    }

    // --- set_target ---

    #[test]
    fn set_target_sets_and_clears() {
        let forest = sample_forest();
        let mut instr = EditInstruction::complete(Level::Execution, vec![1]);
        instr.action = EditAction::SetTarget;
        instr.target_date = Some(1234);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[1].target_date, Some(1234));

        instr.target_date = None;
        let cleared = apply_instruction(&updated, &instr, &opts());
        assert_eq!(cleared.execution[1].target_date, None);
        assert_eq!(cleared.execution[1].all_day, None);
    }

    // --- promote / reorder ---

    #[test]
    fn promote_delegates_to_addressing() {
        let forest = sample_forest();
        let mut instr = EditInstruction::delete(Level::Execution, vec![0, 1]);
        instr.action = EditAction::Promote;
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].text, "Hull");
    }

    #[test]
    fn reorder_directions() {
        let forest = sample_forest();
        let mut instr = EditInstruction::delete(Level::Execution, vec![1]);
        instr.action = EditAction::Reorder;

        instr.direction = Some(Direction::Up);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].text, "Laptop");

        instr.direction = Some(Direction::Top);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[0].text, "Laptop");

        instr.path = vec![0];
        instr.direction = Some(Direction::Bottom);
        let updated = apply_instruction(&forest, &instr, &opts());
        assert_eq!(updated.execution[1].text, "Boat");

        instr.direction = None;
        assert_eq!(apply_instruction(&forest, &instr, &opts()), forest);
    }

    #[test]
    fn reorder_up_at_first_root_is_noop() {
        let forest = sample_forest();
        let mut instr = EditInstruction::delete(Level::Execution, vec![0]);
        instr.action = EditAction::Reorder;
        instr.direction = Some(Direction::Up);
        assert_eq!(apply_instruction(&forest, &instr, &opts()), forest);
    }

    // --- untrusted JSON ---

    #[test]
    fn malformed_json_instructions_are_noops() {
        let forest = sample_forest();
        let garbage = [
            json!({"action": "add"}),                                   // missing level
            json!({"action": "detonate", "level": "execution"}),        // unknown action
            json!({"action": "delete", "level": "galactic", "path": [0]}),
            json!({"action": "delete", "level": "execution", "path": "zero"}),
            json!("not even an object"),
            json!(null),
        ];
        for raw in garbage {
            assert_eq!(apply_json_instruction(&forest, &raw, &opts()), forest, "{raw}");
        }
    }

    #[test]
    fn well_formed_json_instruction_applies() {
        let forest = sample_forest();
        let raw = json!({
            "action": "add",
            "level": "creative",
            "path": [],
            "mode": "thread",
            "text": "Paint",
        });
        let updated = apply_json_instruction(&forest, &raw, &opts());
        assert_eq!(updated.creative[0].text, "Paint");
    }
}
