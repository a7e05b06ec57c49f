use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ScoreEntry;

pub const MAX_HIGHSCORES: usize = 20;

/// A row of the leaderboard as the host shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedRow {
    pub rank: usize,
    pub player: String,
    pub time_str: String,
    pub timestamp: String,
}

/// Puzzle label to its best entries, fastest first, never more than
/// [`MAX_HIGHSCORES`] per puzzle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighscoreTable {
    scores: BTreeMap<String, Vec<ScoreEntry>>,
}

impl HighscoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from arbitrary per-puzzle lists, restoring ordering and bound.
    pub fn from_lists(scores: BTreeMap<String, Vec<ScoreEntry>>) -> Self {
        let mut table = Self { scores };
        table.normalize();
        table
    }

    pub fn insert(&mut self, entry: ScoreEntry) {
        let scores = self.scores.entry(entry.puzzle.clone()).or_default();
        scores.push(entry);
        sort_and_trim(scores);
    }

    pub fn entries(&self, puzzle: &str) -> &[ScoreEntry] {
        self.scores.get(puzzle).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ranked_rows(&self, puzzle: &str) -> Vec<RankedRow> {
        self.entries(puzzle)
            .iter()
            .enumerate()
            .map(|(i, entry)| RankedRow {
                rank: i + 1,
                player: entry.player.clone(),
                time_str: entry.time_str().to_string(),
                timestamp: entry.timestamp.clone(),
            })
            .collect()
    }

    pub fn puzzles(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    pub fn clear_puzzle(&mut self, puzzle: &str) -> bool {
        self.scores.remove(puzzle).is_some()
    }

    pub fn normalize(&mut self) {
        for scores in self.scores.values_mut() {
            sort_and_trim(scores);
        }
    }
}

// Stable sort: equal times keep insertion order, so the earlier attempt ranks higher.
fn sort_and_trim(scores: &mut Vec<ScoreEntry>) {
    scores.sort_by(|a, b| a.time_seconds.total_cmp(&b.time_seconds));
    scores.truncate(MAX_HIGHSCORES);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(player: &str, puzzle: &str, seconds: f64) -> ScoreEntry {
        ScoreEntry::new(player, "", puzzle, seconds, "2025-05-01T10:00:00Z".into(), false)
    }

    #[test]
    fn test_insert_keeps_fastest_first() {
        let mut table = HighscoreTable::new();
        table.insert(entry("a", "1 Inversion", 30.0));
        table.insert(entry("b", "1 Inversion", 10.0));
        table.insert(entry("c", "1 Inversion", 20.0));

        let players: Vec<_> = table
            .entries("1 Inversion")
            .iter()
            .map(|e| e.player.as_str())
            .collect();
        assert_eq!(players, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_insert_bounds_list() {
        let mut table = HighscoreTable::new();
        for i in 0..30 {
            table.insert(entry("p", "4 Ablage", 100.0 - i as f64));
            let scores = table.entries("4 Ablage");
            assert!(scores.len() <= MAX_HIGHSCORES);
            assert!(scores
                .windows(2)
                .all(|w| w[0].time_seconds <= w[1].time_seconds));
        }
        assert_eq!(table.entries("4 Ablage").len(), MAX_HIGHSCORES);
        assert_eq!(table.entries("4 Ablage")[0].time_seconds, 71.0);
    }

    #[test]
    fn test_slow_entry_falls_off_full_list() {
        let mut table = HighscoreTable::new();
        for i in 0..MAX_HIGHSCORES {
            table.insert(entry("p", "4 Ablage", i as f64));
        }
        table.insert(entry("late", "4 Ablage", 999.0));
        assert!(table
            .entries("4 Ablage")
            .iter()
            .all(|e| e.player != "late"));
    }

    #[test]
    fn test_ties_keep_earlier_entry_first() {
        let mut table = HighscoreTable::new();
        table.insert(entry("first", "5 Schublade", 5.0));
        table.insert(entry("second", "5 Schublade", 5.0));
        assert_eq!(table.entries("5 Schublade")[0].player, "first");
    }

    #[test]
    fn test_ranked_rows() {
        let mut table = HighscoreTable::new();
        table.insert(entry("a", "7 Versteck", 65.06));
        table.insert(entry("b", "7 Versteck", 3.0));

        let rows = table.ranked_rows("7 Versteck");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[0].player, "b");
        assert_eq!(rows[1].time_str, "01:05.1");
        assert!(table.ranked_rows("1 Inversion").is_empty());
    }

    #[test]
    fn test_from_lists_normalizes() {
        let mut lists = BTreeMap::new();
        lists.insert(
            "default".to_string(),
            (0..25).rev().map(|i| entry("p", "default", i as f64)).collect(),
        );
        let table = HighscoreTable::from_lists(lists);
        let scores = table.entries("default");
        assert_eq!(scores.len(), MAX_HIGHSCORES);
        assert_eq!(scores[0].time_seconds, 0.0);
    }

    #[test]
    fn test_clear_puzzle() {
        let mut table = HighscoreTable::new();
        table.insert(entry("a", "1 Inversion", 1.0));
        table.insert(entry("a", "2 Schiebetür", 1.0));
        assert!(table.clear_puzzle("1 Inversion"));
        assert_eq!(table.len(), 1);
        table.clear();
        assert!(table.is_empty());
    }
}
