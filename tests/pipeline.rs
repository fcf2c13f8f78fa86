//! End-to-end tests for the edit pipeline: suggestion sequences applied
//! against a forest snapshot, local shortcut precedence, and the
//! single-slot in-flight guard.

use std::sync::{Arc, Barrier};

use braid::ai::{AiError, Pipeline, PipelineError, SuggestionSource, parse_suggestions};
use braid::model::config::InsertPolicy;
use braid::model::instruction::{Suggestion, SuggestionAction, SuggestionKind};
use braid::model::node::{Forest, Level};
use chrono::{Local, TimeZone};
use pretty_assertions::assert_eq;

fn now() -> chrono::DateTime<Local> {
    Local.with_ymd_and_hms(2026, 8, 27, 10, 0, 0).unwrap()
}

fn suggestion(
    action: SuggestionAction,
    kind: SuggestionKind,
    title: &str,
    parent: Option<&str>,
) -> Suggestion {
    Suggestion {
        action,
        kind,
        title: title.to_string(),
        old_title: None,
        parent_title: parent.map(str::to_string),
        target_date: None,
    }
}

/// Replays a fixed suggestion list regardless of input.
struct FixedSource(Vec<Suggestion>);

impl SuggestionSource for FixedSource {
    fn suggest(&self, _forest: &Forest, _text: &str) -> Result<Vec<Suggestion>, AiError> {
        Ok(self.0.clone())
    }
}

/// Returns raw model text, run through the same defensive parser the
/// real client uses.
struct RawPayloadSource(&'static str);

impl SuggestionSource for RawPayloadSource {
    fn suggest(&self, _forest: &Forest, _text: &str) -> Result<Vec<Suggestion>, AiError> {
        Ok(parse_suggestions(self.0))
    }
}

/// Panics if the pipeline ever consults it.
struct UnreachableSource;

impl SuggestionSource for UnreachableSource {
    fn suggest(&self, _forest: &Forest, _text: &str) -> Result<Vec<Suggestion>, AiError> {
        panic!("local shortcut should not reach the model");
    }
}

#[test]
fn suggestion_sequence_builds_nested_structure() {
    // Thread, then a step under it, then a substep under the step, all in
    // one batch against an empty forest. Each later suggestion must see
    // the nodes the earlier ones created.
    let source = FixedSource(vec![
        suggestion(SuggestionAction::Add, SuggestionKind::Thread, "Boat", None),
        suggestion(SuggestionAction::Add, SuggestionKind::Step, "Fix sink", Some("Boat")),
        suggestion(
            SuggestionAction::Add,
            SuggestionKind::Substep,
            "Buy connector",
            Some("Fix sink"),
        ),
    ]);
    let pipeline = Pipeline::new(source, Level::Execution, InsertPolicy::Front);

    let outcome = pipeline
        .submit(&Forest::default(), "boat stuff", now())
        .unwrap();

    assert_eq!(outcome.changed, 3);
    let forest = &outcome.forest;
    assert_eq!(forest.execution.len(), 1);
    assert_eq!(forest.execution[0].text, "Boat");
    assert_eq!(forest.execution[0].steps.len(), 1);
    assert_eq!(forest.execution[0].steps[0].text, "Fix sink");
    assert_eq!(forest.execution[0].steps[0].steps[0].text, "Buy connector");
}

#[test]
fn step_with_unknown_parent_gets_a_fresh_thread() {
    let source = FixedSource(vec![suggestion(
        SuggestionAction::Add,
        SuggestionKind::Step,
        "Oil change",
        Some("Car"),
    )]);
    let pipeline = Pipeline::new(source, Level::Execution, InsertPolicy::Back);

    let outcome = pipeline.submit(&Forest::default(), "car", now()).unwrap();

    // The missing parent is created first, then the step lands inside it.
    assert_eq!(outcome.forest.execution.len(), 1);
    assert_eq!(outcome.forest.execution[0].text, "Car");
    assert_eq!(outcome.forest.execution[0].steps[0].text, "Oil change");
}

#[test]
fn garbage_model_output_changes_nothing() {
    let mut forest = Forest::default();
    forest
        .execution
        .push(braid::model::node::TaskNode::new("Keep me", None, None));

    let pipeline = Pipeline::new(
        RawPayloadSource("this is not json at all"),
        Level::Execution,
        InsertPolicy::Front,
    );
    let outcome = pipeline.submit(&forest, "do something", now()).unwrap();

    assert_eq!(outcome.changed, 0);
    assert_eq!(outcome.forest, forest);
}

#[test]
fn fenced_json_payload_is_accepted() {
    let payload = "```json\n[{\"action\":\"add\",\"type\":\"thread\",\"title\":\"Taxes\"}]\n```";
    let pipeline = Pipeline::new(
        RawPayloadSource(payload),
        Level::Execution,
        InsertPolicy::Front,
    );
    let outcome = pipeline.submit(&Forest::default(), "taxes", now()).unwrap();

    assert_eq!(outcome.changed, 1);
    assert_eq!(outcome.forest.execution[0].text, "Taxes");
}

#[test]
fn local_shortcuts_bypass_the_model() {
    let mut forest = Forest::default();
    forest
        .execution
        .push(braid::model::node::TaskNode::new("Boat", None, None));

    let pipeline = Pipeline::new(UnreachableSource, Level::Execution, InsertPolicy::Front);

    let outcome = pipeline.submit(&forest, "delete boat", now()).unwrap();
    assert_eq!(outcome.changed, 1);
    assert!(outcome.forest.execution.is_empty());

    let outcome = pipeline.submit(&forest, "mark Boat as done", now()).unwrap();
    assert!(outcome.forest.execution[0].completed);

    let outcome = pipeline
        .submit(&forest, "rename Boat to Sailboat", now())
        .unwrap();
    assert_eq!(outcome.forest.execution[0].text, "Sailboat");
}

/// Blocks inside `suggest` until released, so a second submit can observe
/// the in-flight guard.
struct BlockingSource {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

impl SuggestionSource for BlockingSource {
    fn suggest(&self, _forest: &Forest, _text: &str) -> Result<Vec<Suggestion>, AiError> {
        self.entered.wait();
        self.release.wait();
        Ok(vec![])
    }
}

#[test]
fn second_submit_while_in_flight_is_rejected() {
    let entered = Arc::new(Barrier::new(2));
    let release = Arc::new(Barrier::new(2));
    let pipeline = Arc::new(Pipeline::new(
        BlockingSource {
            entered: entered.clone(),
            release: release.clone(),
        },
        Level::Execution,
        InsertPolicy::Front,
    ));

    let worker = {
        let pipeline = pipeline.clone();
        std::thread::spawn(move || pipeline.submit(&Forest::default(), "slow request", now()))
    };

    // Wait until the first request is inside the source, then try another.
    entered.wait();
    assert!(pipeline.is_busy());
    let second = pipeline.submit(&Forest::default(), "another request", now());
    assert!(matches!(second, Err(PipelineError::Busy)));

    release.wait();
    let first = worker.join().unwrap();
    assert!(first.is_ok());
    assert!(!pipeline.is_busy());
}
