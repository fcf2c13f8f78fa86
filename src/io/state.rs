use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::node::Level;

/// Persisted view fold-state: which threads are expanded and which step
/// subtrees are collapsed. Purely cosmetic — losing this file loses
/// nothing but folds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldState {
    #[serde(default)]
    pub expanded_threads: HashMap<String, bool>,
    #[serde(default)]
    pub collapsed_steps: HashMap<String, bool>,
}

/// Key for a root thread: `"execution-2"`.
pub fn thread_key(level: Level, index: usize) -> String {
    format!("{}-{}", level.as_str(), index)
}

/// Key for a nested node: `"execution-0.2.1"`.
pub fn step_key(level: Level, path: &[usize]) -> String {
    let joined: Vec<String> = path.iter().map(usize::to_string).collect();
    format!("{}-{}", level.as_str(), joined.join("."))
}

impl FoldState {
    pub fn is_thread_expanded(&self, level: Level, index: usize) -> bool {
        *self
            .expanded_threads
            .get(&thread_key(level, index))
            .unwrap_or(&false)
    }

    pub fn toggle_thread(&mut self, level: Level, index: usize) {
        let key = thread_key(level, index);
        let entry = self.expanded_threads.entry(key).or_insert(false);
        *entry = !*entry;
    }

    pub fn is_step_collapsed(&self, level: Level, path: &[usize]) -> bool {
        *self
            .collapsed_steps
            .get(&step_key(level, path))
            .unwrap_or(&false)
    }

    pub fn toggle_step(&mut self, level: Level, path: &[usize]) {
        let key = step_key(level, path);
        let entry = self.collapsed_steps.entry(key).or_insert(false);
        *entry = !*entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable() {
        assert_eq!(thread_key(Level::Execution, 2), "execution-2");
        assert_eq!(step_key(Level::Baseline, &[0, 2, 1]), "baseline-0.2.1");
    }

    #[test]
    fn toggling_round_trips() {
        let mut state = FoldState::default();
        assert!(!state.is_thread_expanded(Level::Creative, 0));
        state.toggle_thread(Level::Creative, 0);
        assert!(state.is_thread_expanded(Level::Creative, 0));
        state.toggle_thread(Level::Creative, 0);
        assert!(!state.is_thread_expanded(Level::Creative, 0));

        state.toggle_step(Level::Execution, &[0, 1]);
        assert!(state.is_step_collapsed(Level::Execution, &[0, 1]));
    }

    #[test]
    fn serde_wire_names_are_camel_case() {
        let mut state = FoldState::default();
        state.toggle_thread(Level::Execution, 0);
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("expandedThreads"));
        assert!(json.contains("collapsedSteps"));

        let parsed: FoldState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, FoldState::default());
    }
}
