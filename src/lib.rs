//! braid — a three-level personal task list with an LLM-assisted edit
//! pipeline.
//!
//! Tasks live in a [`model::node::Forest`]: three independent arrays of
//! nested threads (baseline, execution, creative). All edits are pure
//! copy-on-write functions over a forest snapshot; the CLI persists the
//! result through a small file-backed store.

pub mod ai;
pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
