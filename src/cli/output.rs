use chrono::{Local, TimeZone};

use crate::io::state::FoldState;
use crate::model::log::LogEntry;
use crate::model::node::{Forest, Level, TaskNode};

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Render a millisecond timestamp as "27 Aug 2026" (all-day) or
/// "27 Aug 2026 18:00". Out-of-range timestamps render as "?".
pub fn format_target(ts: i64, all_day: bool) -> String {
    match Local.timestamp_millis_opt(ts).single() {
        Some(dt) if all_day => dt.format("%d %b %Y").to_string(),
        Some(dt) => dt.format("%d %b %Y %H:%M").to_string(),
        None => "?".to_string(),
    }
}

fn checkbox(node: &TaskNode) -> &'static str {
    if node.completed { "[x]" } else { "[ ]" }
}

// ---------------------------------------------------------------------------
// Forest rendering
// ---------------------------------------------------------------------------

/// Render the forest as an indented checkbox tree. With a fold state,
/// collapsed subtrees print a step count instead of their children
/// (threads start collapsed, matching the saved-state defaults).
pub fn print_forest(forest: &Forest, only: Option<Level>, fold: Option<&FoldState>) {
    let mut first = true;
    for &level in Level::ALL.iter() {
        if let Some(filter) = only {
            if level != filter {
                continue;
            }
        }
        if !first {
            println!();
        }
        first = false;
        println!("== {} ==", level.as_str());
        let threads = forest.level(level);
        if threads.is_empty() {
            println!("  (empty)");
            continue;
        }
        for (i, node) in threads.iter().enumerate() {
            let collapsed = fold.is_some_and(|f| !f.is_thread_expanded(level, i));
            print_node(node, level, &[i], collapsed, fold);
        }
    }
}

fn print_node(node: &TaskNode, level: Level, path: &[usize], collapsed: bool, fold: Option<&FoldState>) {
    let indent = "  ".repeat(path.len());
    let mut line = format!("{}{} {}", indent, checkbox(node), node.text);
    if let Some(ts) = node.target_date {
        let all_day = node.all_day.unwrap_or(false);
        line.push_str(&format!("  (by {})", format_target(ts, all_day)));
    }
    if node.repeat.is_some() {
        line.push_str("  (weekly)");
    }
    if collapsed && !node.steps.is_empty() {
        let n = node.steps.len();
        line.push_str(&format!("  ({} step{})", n, if n == 1 { "" } else { "s" }));
        println!("{}", line);
        return;
    }
    println!("{}", line);
    for (i, step) in node.steps.iter().enumerate() {
        let mut child_path = path.to_vec();
        child_path.push(i);
        let child_collapsed = fold.is_some_and(|f| f.is_step_collapsed(level, &child_path));
        print_node(step, level, &child_path, child_collapsed, fold);
    }
}

pub fn print_forest_json(forest: &Forest) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(forest)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Log rendering
// ---------------------------------------------------------------------------

pub fn print_logs(logs: &[LogEntry]) {
    if logs.is_empty() {
        println!("(no entries)");
        return;
    }
    // newest first
    for entry in logs.iter().rev() {
        let stamp = match Local.timestamp_millis_opt(entry.timestamp).single() {
            Some(dt) => dt.format("%d %b %Y %H:%M").to_string(),
            None => "?".to_string(),
        };
        println!("{}  [{}] {}", stamp, entry.kind.as_str(), entry.text);
    }
}

pub fn print_logs_json(logs: &[LogEntry]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(logs)?);
    Ok(())
}
