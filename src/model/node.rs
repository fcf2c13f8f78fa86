use chrono::Local;
use serde::{Deserialize, Serialize};

/// The three parallel levels. The set is fixed and closed; every thread
/// lives in exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Baseline,
    Execution,
    Creative,
}

impl Level {
    /// All levels, in traversal order. Title searches and duplicate
    /// resolution depend on this order being stable.
    pub const ALL: [Level; 3] = [Level::Baseline, Level::Execution, Level::Creative];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Baseline => "baseline",
            Level::Execution => "execution",
            Level::Creative => "creative",
        }
    }

    /// Parse a level name (CLI input, config values)
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_lowercase().as_str() {
            "baseline" => Some(Level::Baseline),
            "execution" => Some(Level::Execution),
            "creative" => Some(Level::Creative),
            _ => None,
        }
    }
}

/// Weekly repeat schedule. Weekdays are 0–6 with Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repeat {
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
}

/// A single node in the task tree. Threads, steps and substeps all share
/// this shape; only nesting depth distinguishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskNode {
    /// Display text. Trimmed, never empty ("Untitled" for blank input).
    /// Uniqueness is not guaranteed; title lookups take the first match
    /// in traversal order.
    pub text: String,
    /// Creation time in ms since epoch. Set once, never touched again.
    pub timestamp: i64,
    /// Single canonical completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Optional deadline, independent of `timestamp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<i64>,
    /// Qualifies `target_date`: true = date only, ignore clock time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    /// When present, completing the node reschedules `target_date` to the
    /// next occurrence instead of marking it done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    /// Child nodes (recursive, no depth limit). Never null; absent on the
    /// wire means empty.
    #[serde(default)]
    pub steps: Vec<TaskNode>,
}

impl TaskNode {
    /// Create a new node with creation defaults. Text is trimmed; blank
    /// text becomes "Untitled" rather than an empty node.
    pub fn new(text: &str, target_date: Option<i64>, all_day: Option<bool>) -> Self {
        let t = text.trim();
        TaskNode {
            text: if t.is_empty() { "Untitled".to_string() } else { t.to_string() },
            timestamp: Local::now().timestamp_millis(),
            completed: false,
            target_date,
            all_day: if target_date.is_some() { all_day } else { None },
            repeat: None,
            steps: Vec::new(),
        }
    }
}

/// The full three-level collection of task trees. Every mutation in the
/// engine is copy-on-write: operations take a reference and return a new
/// `Forest` value, leaving the input untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forest {
    #[serde(default)]
    pub baseline: Vec<TaskNode>,
    #[serde(default)]
    pub execution: Vec<TaskNode>,
    #[serde(default)]
    pub creative: Vec<TaskNode>,
}

impl Forest {
    pub fn level(&self, level: Level) -> &Vec<TaskNode> {
        match level {
            Level::Baseline => &self.baseline,
            Level::Execution => &self.execution,
            Level::Creative => &self.creative,
        }
    }

    pub fn level_mut(&mut self, level: Level) -> &mut Vec<TaskNode> {
        match level {
            Level::Baseline => &mut self.baseline,
            Level::Execution => &mut self.execution,
            Level::Creative => &mut self.creative,
        }
    }

    pub fn is_empty(&self) -> bool {
        Level::ALL.iter().all(|l| self.level(*l).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_trims_text() {
        let node = TaskNode::new("  fix heater  ", None, None);
        assert_eq!(node.text, "fix heater");
        assert!(!node.completed);
        assert!(node.steps.is_empty());
        assert!(node.target_date.is_none());
    }

    #[test]
    fn new_node_blank_text_becomes_untitled() {
        let node = TaskNode::new("   ", None, None);
        assert_eq!(node.text, "Untitled");
    }

    #[test]
    fn new_node_all_day_requires_target() {
        let node = TaskNode::new("x", None, Some(true));
        assert!(node.all_day.is_none());

        let node = TaskNode::new("x", Some(1_700_000_000_000), Some(true));
        assert_eq!(node.all_day, Some(true));
    }

    #[test]
    fn level_parse_round_trip() {
        for level in Level::ALL {
            assert_eq!(Level::parse(level.as_str()), Some(level));
        }
        assert_eq!(Level::parse("Execution "), Some(Level::Execution));
        assert_eq!(Level::parse("nope"), None);
    }

    #[test]
    fn node_serde_defaults_steps_to_empty() {
        let node: TaskNode =
            serde_json::from_str(r#"{"text":"a","timestamp":1}"#).unwrap();
        assert!(node.steps.is_empty());
        assert!(!node.completed);
        assert!(node.repeat.is_none());
    }

    #[test]
    fn forest_serde_missing_levels_default_empty() {
        let forest: Forest = serde_json::from_str(r#"{"execution":[]}"#).unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn node_wire_names_are_camel_case() {
        let mut node = TaskNode::new("a", Some(5), Some(true));
        node.timestamp = 1;
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("\"targetDate\":5"));
        assert!(json.contains("\"allDay\":true"));
    }
}
