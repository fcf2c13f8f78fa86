use serde::{Deserialize, Serialize};

use crate::model::node::Level;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub edit: EditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Chat-completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// API key. `BRAID_API_KEY` in the environment takes precedence; with
    /// neither set the AI path is skipped entirely.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditConfig {
    /// Level that title-addressed instructions and bare adds land in when
    /// no level is given.
    #[serde(default = "default_level")]
    pub default_level: Level,
    /// Where newly created nodes are inserted within their container.
    #[serde(default)]
    pub insert: InsertPolicy,
}

impl Default for EditConfig {
    fn default() -> Self {
        EditConfig {
            default_level: default_level(),
            insert: InsertPolicy::default(),
        }
    }
}

fn default_level() -> Level {
    Level::Execution
}

/// Insertion position for new nodes. A policy rather than a contract:
/// nothing else in the engine may assume where a fresh node landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPolicy {
    #[default]
    Front,
    Back,
}
