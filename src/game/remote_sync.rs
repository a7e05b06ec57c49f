//! Conversion between the shared sheet and local highscores.
//!
//! The sheet keeps puzzles as numeric codes and times as `M:SS.t` text (older
//! rows may hold plain seconds). Column names are resolved through
//! [`REMOTE_SCHEMA`]; a row that cannot be turned into an entry is skipped
//! with a reason rather than failing the whole load.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info};

use crate::error::RemoteError;
use crate::helpers::parse_time_seconds;
use crate::model::{HighscoreTable, Puzzle, ScoreEntry, SessionScoreLog, DEFAULT_PLAYER};
use crate::remote::{Cell, RemoteRow, RemoteTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Player,
    Identifier,
    Time,
    Puzzle,
    Recorded,
    Duel,
}

/// Canonical column name first, then older spellings still found in sheets.
pub const REMOTE_SCHEMA: &[(Field, &[&str])] = &[
    (Field::Player, &["Player", "player"]),
    (Field::Identifier, &["Identifier", "identifier"]),
    (Field::Time, &["Time", "time"]),
    (Field::Puzzle, &["Puzzle", "puzzle"]),
    (Field::Recorded, &["Recorded", "recorded"]),
    (Field::Duel, &["Duel", "duel_mode"]),
];

impl Field {
    fn column_names(self) -> &'static [&'static str] {
        REMOTE_SCHEMA
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, names)| *names)
            .unwrap_or(&[])
    }

    /// Name written when pushing rows.
    pub fn column(self) -> &'static str {
        self.column_names().first().copied().unwrap_or_default()
    }

    fn lookup(self, row: &RemoteRow) -> Option<&Cell> {
        self.column_names()
            .iter()
            .find_map(|name| row.get(name))
            .filter(|cell| !cell.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingPuzzle,
    MissingTime,
    UnparsableTime(String),
}

/// Builds a highscore table from sheet rows. Fails only when the rows as a
/// whole lack a time or puzzle column.
pub fn merge_from_remote(rows: &[RemoteRow]) -> Result<HighscoreTable, RemoteError> {
    validate_schema(rows)?;

    let (entries, skipped): (Vec<_>, Vec<_>) = rows.iter().map(row_to_entry).partition_result();
    for reason in &skipped {
        debug!(target: "remote", "skipping row: {:?}", reason);
    }

    let lists: BTreeMap<String, Vec<ScoreEntry>> = entries
        .into_iter()
        .into_group_map_by(|entry| entry.puzzle.clone())
        .into_iter()
        .collect();

    info!(
        target: "remote",
        "merged {} rows into {} puzzles ({} skipped)",
        rows.len() - skipped.len(),
        lists.len(),
        skipped.len()
    );
    Ok(HighscoreTable::from_lists(lists))
}

fn validate_schema(rows: &[RemoteRow]) -> Result<(), RemoteError> {
    if rows.is_empty() {
        return Ok(());
    }
    for field in [Field::Time, Field::Puzzle] {
        let present = rows.iter().any(|row| {
            field
                .column_names()
                .iter()
                .any(|name| row.has_column(name))
        });
        if !present {
            return Err(RemoteError::Schema(field.column()));
        }
    }
    Ok(())
}

pub fn row_to_entry(row: &RemoteRow) -> Result<ScoreEntry, SkipReason> {
    let puzzle = Field::Puzzle
        .lookup(row)
        .and_then(puzzle_label)
        .ok_or(SkipReason::MissingPuzzle)?;

    let time_cell = Field::Time.lookup(row).ok_or(SkipReason::MissingTime)?;
    let seconds = match time_cell {
        Cell::Number(n) if n.is_finite() && *n >= 0.0 => Some(*n),
        Cell::Text(text) => parse_time_seconds(text),
        _ => None,
    }
    .ok_or_else(|| SkipReason::UnparsableTime(time_cell.as_text().unwrap_or_default()))?;

    let text = |field: Field| {
        field
            .lookup(row)
            .and_then(Cell::as_text)
            .unwrap_or_default()
    };
    let identifier = Some(text(Field::Identifier)).filter(|id| id != "0").unwrap_or_default();
    let player = Field::Player
        .lookup(row)
        .and_then(Cell::as_text)
        .unwrap_or_else(|| DEFAULT_PLAYER.to_string());
    let duel_mode = Field::Duel.lookup(row).is_some_and(Cell::as_bool);

    Ok(ScoreEntry::new(
        &player,
        &identifier,
        &puzzle,
        seconds,
        text(Field::Recorded),
        duel_mode,
    ))
}

/// Codes map back to labels; unknown codes keep their number as the label,
/// and non-numeric text is taken as a label already.
fn puzzle_label(cell: &Cell) -> Option<String> {
    let code = match cell {
        Cell::Number(n) => Some(n.trunc() as i64),
        Cell::Text(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    match code {
        Some(code) => Some(
            Puzzle::from_code(code)
                .map(|p| p.label().to_string())
                .unwrap_or_else(|| code.to_string()),
        ),
        None => cell.as_text(),
    }
}

/// Empty identifiers go to the sheet as `0`, which is how the sheet has
/// always marked "none given".
pub fn entry_to_row(entry: &ScoreEntry) -> RemoteRow {
    let identifier = if entry.identifier.is_empty() {
        Cell::Number(0.0)
    } else {
        Cell::from(entry.identifier.as_str())
    };
    let puzzle = Puzzle::from_label(&entry.puzzle)
        .map(|p| Cell::Number(p.code() as f64))
        .unwrap_or(Cell::Empty);
    RemoteRow::new()
        .with(Field::Player.column(), entry.player.as_str())
        .with(Field::Identifier.column(), identifier)
        .with(Field::Time.column(), entry.time_str())
        .with(Field::Puzzle.column(), puzzle)
        .with(Field::Recorded.column(), entry.timestamp.as_str())
        .with(Field::Duel.column(), entry.duel_mode)
}

/// Appends the session's entries after `existing` and overwrites the sheet.
/// Returns how many rows were added. The caller clears the log on success.
pub fn push_session(
    log: &SessionScoreLog,
    existing: Vec<RemoteRow>,
    table: &mut dyn RemoteTable,
) -> Result<usize, RemoteError> {
    let pushed = log.len();
    let mut rows = existing;
    rows.extend(log.entries().iter().map(entry_to_row));
    table.overwrite_all(&rows)?;
    info!(target: "remote", "pushed {} rows ({} total)", pushed, rows.len());
    Ok(pushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryTable;

    fn sheet_row(player: &str, time: impl Into<Cell>, puzzle: impl Into<Cell>) -> RemoteRow {
        RemoteRow::new()
            .with("Player", player)
            .with("Identifier", 4711.0)
            .with("Time", time)
            .with("Puzzle", puzzle)
            .with("Recorded", "2025-05-01T10:00:00Z")
            .with("Duel", false)
    }

    #[test]
    fn test_minutes_text_and_code_resolve() {
        let table = merge_from_remote(&[sheet_row("Ada", "1:05.2", 3.0)]).unwrap();
        let scores = table.entries("3 Falltür");
        assert_eq!(scores.len(), 1);
        assert!((scores[0].time_seconds - 65.2).abs() < 1e-9);
        assert_eq!(scores[0].identifier, "4711");
        assert_eq!(scores[0].time_str(), "01:05.2");
    }

    #[test]
    fn test_unparsable_time_is_skipped() {
        let rows = [sheet_row("Ada", "abc", 1.0), sheet_row("Bob", 12.5, 1.0)];
        let table = merge_from_remote(&rows).unwrap();
        let scores = table.entries("1 Inversion");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].player, "Bob");
        assert_eq!(
            row_to_entry(&rows[0]),
            Err(SkipReason::UnparsableTime("abc".into()))
        );
    }

    #[test]
    fn test_missing_puzzle_is_skipped() {
        let row = sheet_row("Ada", 10.0, Cell::Empty);
        assert_eq!(row_to_entry(&row), Err(SkipReason::MissingPuzzle));
        assert!(merge_from_remote(&[row]).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_code_keeps_number() {
        let table = merge_from_remote(&[sheet_row("Ada", 10.0, "9")]).unwrap();
        assert_eq!(table.entries("9").len(), 1);
    }

    #[test]
    fn test_text_label_is_used_verbatim() {
        let table = merge_from_remote(&[sheet_row("Ada", 10.0, "Bonus")]).unwrap();
        assert_eq!(table.entries("Bonus").len(), 1);
    }

    #[test]
    fn test_lowercase_columns_and_blank_player() {
        let row = RemoteRow::new()
            .with("player", "")
            .with("time", "0:42")
            .with("puzzle", 7.0)
            .with("duel_mode", "TRUE");
        let entry = row_to_entry(&row).unwrap();
        assert_eq!(entry.player, DEFAULT_PLAYER);
        assert_eq!(entry.puzzle, "7 Versteck");
        assert_eq!(entry.time_seconds, 42.0);
        assert!(entry.duel_mode);
    }

    #[test]
    fn test_groups_are_sorted_and_trimmed() {
        let rows: Vec<_> = (0..25)
            .map(|i| sheet_row("p", (100 - i) as f64, 2.0))
            .collect();
        let table = merge_from_remote(&rows).unwrap();
        let scores = table.entries("2 Schiebetür");
        assert_eq!(scores.len(), 20);
        assert_eq!(scores[0].time_seconds, 76.0);
    }

    #[test]
    fn test_missing_time_column_is_schema_error() {
        let row = RemoteRow::new().with("Player", "Ada").with("Puzzle", 1.0);
        assert!(matches!(
            merge_from_remote(&[row]),
            Err(RemoteError::Schema("Time"))
        ));
        assert!(merge_from_remote(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_push_appends_after_existing() {
        let existing = vec![sheet_row("Old", "0:30.0", 1.0)];
        let mut log = SessionScoreLog::new();
        log.push(ScoreEntry::new("Ada", "", "3 Falltür", 65.2, "t".into(), true));
        let mut table = MemoryTable::default();

        assert_eq!(push_session(&log, existing, &mut table).unwrap(), 1);

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Player"), Some(&Cell::from("Old")));
        assert_eq!(rows[1].get("Puzzle"), Some(&Cell::Number(3.0)));
        assert_eq!(rows[1].get("Time"), Some(&Cell::from("01:05.2")));
        assert_eq!(rows[1].get("Duel"), Some(&Cell::Bool(true)));
        assert_eq!(rows[1].columns().collect::<Vec<_>>(), vec![
            "Player",
            "Identifier",
            "Time",
            "Puzzle",
            "Recorded",
            "Duel"
        ]);
    }

    #[test]
    fn test_empty_identifier_is_pushed_as_zero() {
        let entry = ScoreEntry::new("Ada", "", "1 Inversion", 5.0, "t".into(), false);
        let row = entry_to_row(&entry);
        assert_eq!(row.get("Identifier"), Some(&Cell::Number(0.0)));
        assert_eq!(row_to_entry(&row).unwrap().identifier, "");

        let entry = ScoreEntry::new("Ada", "s123", "1 Inversion", 5.0, "t".into(), false);
        assert_eq!(entry_to_row(&entry).get("Identifier"), Some(&Cell::from("s123")));
    }

    #[test]
    fn test_nested_time_cell_is_skipped() {
        let body = serde_json::json!([
            {"Player": "Ada", "Time": "1:05.2", "Puzzle": 3},
            {"Player": "Bob", "Time": {"v": 1}, "Puzzle": 3},
            null
        ]);
        let rows = RemoteRow::decode_rows(serde_json::from_value(body).unwrap());
        let table = merge_from_remote(&rows).unwrap();

        let scores = table.entries("3 Falltür");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].player, "Ada");
        assert_eq!(row_to_entry(&rows[1]), Err(SkipReason::MissingTime));
    }

    #[test]
    fn test_pushed_rows_read_back() {
        let mut log = SessionScoreLog::new();
        log.push(ScoreEntry::new("Ada", "", "5 Schublade", 12.3, "t".into(), false));
        let mut table = MemoryTable::default();
        push_session(&log, Vec::new(), &mut table).unwrap();

        let merged = merge_from_remote(&table.rows()).unwrap();
        assert!((merged.entries("5 Schublade")[0].time_seconds - 12.3).abs() < 1e-9);
    }

    #[test]
    fn test_push_failure_is_reported() {
        let mut log = SessionScoreLog::new();
        log.push(ScoreEntry::new("Ada", "", "3 Falltür", 1.0, "t".into(), false));
        let mut table = MemoryTable::default();
        table.set_online(false);

        assert!(push_session(&log, Vec::new(), &mut table).is_err());
        assert_eq!(log.len(), 1);
    }
}
