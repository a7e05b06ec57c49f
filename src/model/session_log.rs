use super::ScoreEntry;

/// Entries recorded since the last successful sync. This is the batch pushed
/// to the remote table; the highscore table is unaffected by clearing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionScoreLog {
    entries: Vec<ScoreEntry>,
}

impl SessionScoreLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
