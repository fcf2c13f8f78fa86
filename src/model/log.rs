use chrono::Local;
use serde::{Deserialize, Serialize};

/// Category of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Food,
    Supplement,
    Gym,
    Sleep,
    Walk,
    Mood,
    Dream,
    Insight,
    Event,
}

impl LogKind {
    pub fn parse(s: &str) -> Option<LogKind> {
        match s.trim().to_lowercase().as_str() {
            "food" => Some(LogKind::Food),
            "supplement" => Some(LogKind::Supplement),
            "gym" => Some(LogKind::Gym),
            "sleep" => Some(LogKind::Sleep),
            "walk" => Some(LogKind::Walk),
            "mood" => Some(LogKind::Mood),
            "dream" => Some(LogKind::Dream),
            "insight" => Some(LogKind::Insight),
            "event" => Some(LogKind::Event),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogKind::Food => "food",
            LogKind::Supplement => "supplement",
            LogKind::Gym => "gym",
            LogKind::Sleep => "sleep",
            LogKind::Walk => "walk",
            LogKind::Mood => "mood",
            LogKind::Dream => "dream",
            LogKind::Insight => "insight",
            LogKind::Event => "event",
        }
    }
}

/// Free-form life-log entry. Stored separately from the task forest and
/// carries none of its invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub text: String,
    pub timestamp: i64,
}

impl LogEntry {
    pub fn new(kind: LogKind, text: &str) -> Self {
        LogEntry {
            kind,
            text: text.trim().to_string(),
            timestamp: Local::now().timestamp_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parse_round_trip() {
        for kind in [
            LogKind::Food,
            LogKind::Supplement,
            LogKind::Gym,
            LogKind::Sleep,
            LogKind::Walk,
            LogKind::Mood,
            LogKind::Dream,
            LogKind::Insight,
            LogKind::Event,
        ] {
            assert_eq!(LogKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(LogKind::parse("nap"), None);
    }
}
