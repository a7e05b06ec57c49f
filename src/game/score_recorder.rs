use chrono::{DateTime, SecondsFormat, Utc};
use log::{info, warn};

use super::HighscoreStore;
use crate::error::{PersistenceError, ValidationError};
use crate::model::{HighscoreTable, Puzzle, ScoreEntry, SessionScoreLog};

/// What the host knows when a timing stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRequest<'a> {
    pub player: &'a str,
    pub identifier: &'a str,
    pub puzzle: &'a str,
    pub elapsed: f64,
    pub duel_mode: bool,
}

#[derive(Debug)]
pub struct RecordOutcome {
    pub entry: ScoreEntry,
    /// The in-memory table is updated either way; this only says whether the
    /// file caught up.
    pub persisted: Result<(), PersistenceError>,
}

impl RecordOutcome {
    /// 1-based position of the new entry, if it made the list.
    pub fn rank(&self, table: &HighscoreTable) -> Option<usize> {
        table
            .entries(&self.entry.puzzle)
            .iter()
            .position(|e| e == &self.entry)
            .map(|i| i + 1)
    }
}

pub struct ScoreRecorder {
    store: HighscoreStore,
}

impl ScoreRecorder {
    pub fn new(store: HighscoreStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &HighscoreStore {
        &self.store
    }

    pub fn record(
        &self,
        table: &mut HighscoreTable,
        log: &mut SessionScoreLog,
        request: &RecordRequest<'_>,
    ) -> Result<RecordOutcome, ValidationError> {
        self.record_at(table, log, request, Utc::now())
    }

    /// Validates, then appends to both the session log and the table and
    /// writes the whole table through. Nothing is touched on a validation
    /// error.
    pub fn record_at(
        &self,
        table: &mut HighscoreTable,
        log: &mut SessionScoreLog,
        request: &RecordRequest<'_>,
        recorded_at: DateTime<Utc>,
    ) -> Result<RecordOutcome, ValidationError> {
        let puzzle = validate(request)?;

        let entry = ScoreEntry::new(
            request.player,
            request.identifier,
            puzzle.label(),
            request.elapsed,
            recorded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            request.duel_mode,
        );
        info!(
            target: "recorder",
            "{} finished {} in {}",
            entry.player,
            entry.puzzle,
            entry.time_str()
        );

        log.push(entry.clone());
        table.insert(entry.clone());

        let persisted = self.store.save(table);
        if let Err(err) = &persisted {
            warn!(target: "recorder", "highscores kept in memory only: {}", err);
        }

        Ok(RecordOutcome { entry, persisted })
    }
}

pub fn validate(request: &RecordRequest<'_>) -> Result<Puzzle, ValidationError> {
    let label = request.puzzle.trim();
    if label.is_empty() {
        return Err(ValidationError::MissingPuzzle);
    }
    let puzzle =
        Puzzle::from_label(label).ok_or_else(|| ValidationError::UnknownPuzzle(label.to_string()))?;
    if request.player.trim().is_empty() {
        return Err(ValidationError::MissingPlayer);
    }
    Ok(puzzle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MAX_HIGHSCORES;
    use crate::tests::UsingLogger;
    use chrono::TimeZone;
    use test_context::test_context;

    fn recorder() -> ScoreRecorder {
        ScoreRecorder::new(HighscoreStore::new(
            std::env::temp_dir()
                .join(format!("setbox-{}", uuid::Uuid::new_v4()))
                .join("highscores.json"),
        ))
    }

    fn request(puzzle: &str, elapsed: f64) -> RecordRequest<'_> {
        RecordRequest {
            player: "Ada",
            identifier: "4711",
            puzzle,
            elapsed,
            duel_mode: false,
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_record_appends_everywhere_and_persists(_: &mut UsingLogger) {
        let recorder = recorder();
        let mut table = HighscoreTable::new();
        let mut log = SessionScoreLog::new();
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();

        let outcome = recorder
            .record_at(&mut table, &mut log, &request("3 Falltür", 12.3), at)
            .unwrap();

        assert!(outcome.persisted.is_ok());
        assert_eq!(outcome.entry.timestamp, "2025-05-01T10:00:00.000000Z");
        assert_eq!(outcome.entry.time_str(), "00:12.3");
        assert_eq!(log.entries(), &[outcome.entry.clone()]);
        assert_eq!(table.entries("3 Falltür"), &[outcome.entry.clone()]);
        assert_eq!(outcome.rank(&table), Some(1));
        assert_eq!(recorder.store().load(), table);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_record_keeps_list_sorted_and_bounded(_: &mut UsingLogger) {
        let recorder = recorder();
        let mut table = HighscoreTable::new();
        let mut log = SessionScoreLog::new();

        for i in 0..(MAX_HIGHSCORES + 5) {
            let elapsed = ((i * 7) % 23) as f64 + 0.5;
            recorder
                .record(&mut table, &mut log, &request("1 Inversion", elapsed))
                .unwrap();
            let scores = table.entries("1 Inversion");
            assert!(scores.len() <= MAX_HIGHSCORES);
            assert!(scores
                .windows(2)
                .all(|w| w[0].time_seconds <= w[1].time_seconds));
        }
        assert_eq!(log.len(), MAX_HIGHSCORES + 5);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_validation_errors_leave_state_untouched(_: &mut UsingLogger) {
        let recorder = recorder();
        let mut table = HighscoreTable::new();
        let mut log = SessionScoreLog::new();

        let missing_puzzle = recorder.record(&mut table, &mut log, &request("", 1.0));
        assert_eq!(missing_puzzle.unwrap_err(), ValidationError::MissingPuzzle);

        let unknown = recorder.record(&mut table, &mut log, &request("8 Tresor", 1.0));
        assert_eq!(
            unknown.unwrap_err(),
            ValidationError::UnknownPuzzle("8 Tresor".into())
        );

        let mut nobody = request("1 Inversion", 1.0);
        nobody.player = " ";
        let missing_player = recorder.record(&mut table, &mut log, &nobody);
        assert_eq!(missing_player.unwrap_err(), ValidationError::MissingPlayer);

        assert!(table.is_empty());
        assert!(log.is_empty());
        assert!(!recorder.store().path().exists());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_persistence_failure_keeps_entry(_: &mut UsingLogger) {
        let dir = std::env::temp_dir().join(format!("setbox-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let recorder = ScoreRecorder::new(HighscoreStore::new(dir));
        let mut table = HighscoreTable::new();
        let mut log = SessionScoreLog::new();

        let outcome = recorder
            .record(&mut table, &mut log, &request("2 Schiebetür", 4.0))
            .unwrap();

        assert!(outcome.persisted.is_err());
        assert_eq!(table.entries("2 Schiebetür").len(), 1);
        assert_eq!(log.len(), 1);
    }
}
