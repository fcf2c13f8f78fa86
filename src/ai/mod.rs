pub mod client;
pub mod pipeline;

pub use client::{AiError, OpenAiClient, SuggestionSource, parse_suggestions};
pub use pipeline::{Outcome, Pipeline, PipelineError};
