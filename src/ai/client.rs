//! The suggestion model collaborator: free text plus a forest snapshot in,
//! a list of high-level suggestions out.
//!
//! The response is untrusted end to end. Markdown fences are stripped,
//! non-JSON and non-array payloads collapse to zero suggestions, and each
//! element passes through [`Suggestion::sanitize`] before anything
//! downstream sees it.

use serde_json::Value;

use crate::model::config::AiConfig;
use crate::model::instruction::Suggestion;
use crate::model::node::Forest;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("suggestion request failed: {0}")]
    Http(Box<ureq::Error>),
    #[error("suggestion response unreadable: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can turn user text into edit suggestions. The production
/// implementation calls a chat-completions API; tests substitute stubs.
pub trait SuggestionSource {
    fn suggest(&self, forest: &Forest, text: &str) -> Result<Vec<Suggestion>, AiError>;
}

const SYSTEM_PROMPT: &str = r#"You convert user text about tasks into a JSON ARRAY of edit instructions.

Return ONLY valid JSON. No markdown, no backticks, no explanations.

Each object in the array MUST have this shape:
{
  "action": "add" | "delete" | "edit",
  "type": "thread" | "step" | "substep",
  "title": "string",
  "old_title": "string or null",
  "parent_title": "string or null",
  "targetDate": null
}

Semantics:
- action = "add": create new items.
- action = "delete": remove existing items by title.
- action = "edit": rename an existing item from old_title to title.

Types:
- type = "thread": top-level item (e.g. "Laptop", "Boat").
- type = "step": direct child of a thread.
- type = "substep": child of a step.

Fields:
- title: for add -> new title; for delete -> title to delete; for edit -> new title.
- old_title: ONLY for edit, the previous title. null for add/delete.
- parent_title: for step/substep -> the title of the parent node. For thread -> null.
- targetDate: always null. Date logic is handled by the app, not by you.

If the request is not about changing tasks, return []."#;

/// Chat-completions backed suggestion source.
pub struct OpenAiClient {
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    /// Build from config; `BRAID_API_KEY` in the environment wins over the
    /// configured key.
    pub fn from_config(config: &AiConfig) -> Self {
        let api_key = std::env::var("BRAID_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| config.api_key.clone());
        OpenAiClient {
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            api_key,
        }
    }
}

impl SuggestionSource for OpenAiClient {
    fn suggest(&self, forest: &Forest, text: &str) -> Result<Vec<Suggestion>, AiError> {
        let Some(key) = self.api_key.as_deref() else {
            tracing::debug!("no api key configured, skipping suggestion request");
            return Ok(Vec::new());
        };

        let snapshot =
            serde_json::to_string(forest).unwrap_or_else(|_| String::from("{}"));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                {
                    "role": "user",
                    "content": format!(
                        "Current tasks:\n{snapshot}\n\nUser instruction:\n{text}"
                    ),
                },
            ],
            "temperature": 0.2,
        });

        let response = ureq::post(&self.api_url)
            .set("Authorization", &format!("Bearer {key}"))
            .send_json(body)
            .map_err(|e| AiError::Http(Box::new(e)))?;
        let payload: Value = response.into_json()?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("[]");
        tracing::debug!(len = content.len(), "suggestion payload received");
        Ok(parse_suggestions(content))
    }
}

/// Parse raw model output into suggestions, tolerating every malformation
/// we've seen a model produce.
pub fn parse_suggestions(content: &str) -> Vec<Suggestion> {
    let cleaned = strip_code_fences(content);
    let value: Value = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(%err, "suggestion payload is not valid json");
            return Vec::new();
        }
    };
    let Some(items) = value.as_array() else {
        tracing::warn!("suggestion payload is not an array, ignoring");
        return Vec::new();
    };
    items.iter().filter_map(Suggestion::sanitize).collect()
}

/// Remove a ```json ... ``` wrapper a model may add despite instructions.
fn strip_code_fences(content: &str) -> &str {
    let s = content.trim();
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```JSON"))
        .or_else(|| s.strip_prefix("```"))
        .unwrap_or(s);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}
