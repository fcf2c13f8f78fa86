//! The submission pipeline: one entry point for raw user text.
//!
//! Shortcut commands are handled locally and never reach the model. Other
//! text goes to the suggestion source, whose output is adapted and applied
//! sequentially against the evolving forest — later suggestions see the
//! effects of earlier ones. At most one suggestion request is in flight at
//! a time; a second submission while busy is rejected, not queued.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Local};

use crate::ai::client::SuggestionSource;
use crate::model::config::InsertPolicy;
use crate::model::node::{Forest, Level};
use crate::ops::reducer::{self, ApplyOptions};
use crate::ops::resolve;
use crate::parse::{self, Command};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("a request is already in flight")]
    Busy,
}

/// Result of one submission: the (possibly new) forest and how many
/// instructions actually changed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub forest: Forest,
    pub changed: usize,
}

impl Outcome {
    pub fn unchanged(forest: Forest) -> Self {
        Outcome { forest, changed: 0 }
    }

    /// User-facing result line. Degraded runs read as a neutral
    /// "no changes", never as an error.
    pub fn summary(&self) -> String {
        match self.changed {
            0 => "no changes".to_string(),
            1 => "changed 1 item".to_string(),
            n => format!("changed {n} items"),
        }
    }
}

pub struct Pipeline<S> {
    source: S,
    default_level: Level,
    insert: InsertPolicy,
    busy: AtomicBool,
}

impl<S: SuggestionSource> Pipeline<S> {
    pub fn new(source: S, default_level: Level, insert: InsertPolicy) -> Self {
        Pipeline {
            source,
            default_level,
            insert,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one piece of user text against a forest snapshot.
    pub fn submit(
        &self,
        forest: &Forest,
        text: &str,
        now: DateTime<Local>,
    ) -> Result<Outcome, PipelineError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Outcome::unchanged(forest.clone()));
        }

        // local fast path: no model involved
        if let Some(command) = parse::parse_command(text) {
            let (updated, changed) = match command {
                Command::Delete { title } => resolve::delete_by_title(forest, &title),
                Command::Rename { old, new } => resolve::rename_by_title(forest, &old, &new),
                Command::MarkDone { title } => resolve::mark_done_by_title(forest, &title),
            };
            return Ok(Outcome { forest: updated, changed: usize::from(changed) });
        }

        // single-slot in-flight guard
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(PipelineError::Busy);
        }
        let outcome = self.run_suggestions(forest, text, now);
        self.busy.store(false, Ordering::SeqCst);
        Ok(outcome)
    }

    fn run_suggestions(&self, forest: &Forest, text: &str, now: DateTime<Local>) -> Outcome {
        let suggestions = match self.source.suggest(forest, text) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!(%err, "suggestion request failed, applying nothing");
                return Outcome::unchanged(forest.clone());
            }
        };

        let inferred = parse::infer_target_date(text, now);
        let opts = ApplyOptions {
            fallback_target: inferred.ts,
            fallback_all_day: inferred.all_day,
            insert: self.insert,
        };

        let mut current = forest.clone();
        let mut changed = 0;
        for suggestion in &suggestions {
            // adapt against the evolving forest so this suggestion sees
            // everything the previous ones did
            let instructions =
                resolve::adapt_suggestion(&current, suggestion, self.default_level, self.insert);
            for instruction in instructions {
                let next = reducer::apply_instruction(&current, &instruction, &opts);
                if next != current {
                    changed += 1;
                }
                current = next;
            }
        }
        Outcome { forest: current, changed }
    }
}
