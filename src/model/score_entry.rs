use serde::{Deserialize, Deserializer, Serialize};

use crate::helpers::format_time;

pub const DEFAULT_PLAYER: &str = "Anonymous";

/// One completed attempt by one player on one puzzle.
///
/// `time_str` is derived from `time_seconds` whenever an entry is built or
/// read back from disk, so the stored rendering can never drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredScoreEntry", into = "StoredScoreEntry")]
pub struct ScoreEntry {
    pub player: String,
    pub identifier: String,
    pub puzzle: String,
    pub time_seconds: f64,
    time_str: String,
    pub timestamp: String,
    pub duel_mode: bool,
}

impl ScoreEntry {
    pub fn new(
        player: &str,
        identifier: &str,
        puzzle: &str,
        time_seconds: f64,
        timestamp: String,
        duel_mode: bool,
    ) -> Self {
        let player = player.trim();
        let time_seconds = time_seconds.max(0.0);
        Self {
            player: if player.is_empty() {
                DEFAULT_PLAYER.to_string()
            } else {
                player.to_string()
            },
            identifier: identifier.trim().to_string(),
            puzzle: puzzle.to_string(),
            time_seconds,
            time_str: format_time(time_seconds),
            timestamp,
            duel_mode,
        }
    }

    pub fn time_str(&self) -> &str {
        &self.time_str
    }
}

/// On-disk shape. Older files may lack `identifier`, `duel_mode` or `time_str`,
/// and some wrote the identifier as a bare number.
#[derive(Serialize, Deserialize)]
struct StoredScoreEntry {
    #[serde(default)]
    player: String,
    #[serde(default, deserialize_with = "string_or_number")]
    identifier: String,
    #[serde(default)]
    puzzle: String,
    time_seconds: f64,
    #[serde(default)]
    time_str: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    duel_mode: bool,
}

impl From<StoredScoreEntry> for ScoreEntry {
    fn from(stored: StoredScoreEntry) -> Self {
        ScoreEntry::new(
            &stored.player,
            &stored.identifier,
            &stored.puzzle,
            stored.time_seconds,
            stored.timestamp,
            stored.duel_mode,
        )
    }
}

impl From<ScoreEntry> for StoredScoreEntry {
    fn from(entry: ScoreEntry) -> Self {
        StoredScoreEntry {
            player: entry.player,
            identifier: entry.identifier,
            puzzle: entry.puzzle,
            time_seconds: entry.time_seconds,
            time_str: entry.time_str,
            timestamp: entry.timestamp,
            duel_mode: entry.duel_mode,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        // a zero identifier means "none given"
        Raw::Int(0) => String::new(),
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
        Raw::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_time_str() {
        let entry = ScoreEntry::new("Ada", "", "1 Inversion", 65.06, "t".into(), false);
        assert_eq!(entry.time_str(), "01:05.1");
    }

    #[test]
    fn test_blank_player_becomes_anonymous() {
        let entry = ScoreEntry::new("  ", "", "1 Inversion", 1.0, "t".into(), false);
        assert_eq!(entry.player, DEFAULT_PLAYER);
    }

    #[test]
    fn test_stored_time_str_is_recomputed() {
        let json = r#"{
            "player": "Ada",
            "identifier": 123456,
            "puzzle": "3 Falltür",
            "time_seconds": 12.3,
            "time_str": "99:99.9",
            "timestamp": "2025-01-01T10:00:00Z"
        }"#;
        let entry: ScoreEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.time_str(), "00:12.3");
        assert_eq!(entry.identifier, "123456");
        assert!(!entry.duel_mode);
    }

    #[test]
    fn test_zero_identifier_reads_as_empty() {
        let json = r#"{"player": "Ada", "identifier": 0, "puzzle": "x", "time_seconds": 1.0}"#;
        let entry: ScoreEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.identifier, "");
    }

    #[test]
    fn test_serializes_all_fields() {
        let entry = ScoreEntry::new("Jörg", "42", "2 Schiebetür", 3.0, "t".into(), true);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["player"], "Jörg");
        assert_eq!(value["time_str"], "00:03.0");
        assert_eq!(value["duel_mode"], true);
        assert_eq!(value["identifier"], "42");
    }
}
