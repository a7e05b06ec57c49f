use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::model::{HighscoreTable, ScoreEntry};

/// Key that a pre-puzzle (flat list) highscore file is filed under.
pub const LEGACY_PUZZLE_KEY: &str = "default";

/// The local highscore file.
#[derive(Debug, Clone)]
pub struct HighscoreStore {
    path: PathBuf,
}

impl HighscoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing or unreadable file yields an empty table.
    pub fn load(&self) -> HighscoreTable {
        match self.try_load() {
            Ok(table) => table,
            Err(err) => {
                warn!(target: "highscores", "starting with empty highscores: {}", err);
                HighscoreTable::new()
            }
        }
    }

    /// Like [`Self::load`] but reports why the file could not be used. A
    /// missing file is not an error.
    pub fn try_load(&self) -> Result<HighscoreTable, PersistenceError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(target: "highscores", "no highscore file at {}", self.path.display());
                return Ok(HighscoreTable::new());
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let root: Value =
            serde_json::from_str(&contents).map_err(|source| PersistenceError::Serialization {
                path: self.path.clone(),
                source,
            })?;

        let table = HighscoreTable::from_lists(parse_lists(root));
        info!(
            target: "highscores",
            "loaded {} entries from {}",
            table.len(),
            self.path.display()
        );
        Ok(table)
    }

    pub fn save(&self, table: &HighscoreTable) -> Result<(), PersistenceError> {
        let io_err = |source| PersistenceError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        // serde_json leaves non-ASCII characters as they are
        let contents =
            serde_json::to_string_pretty(table).map_err(|source| PersistenceError::Serialization {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, contents).map_err(io_err)?;
        debug!(target: "highscores", "saved {} entries", table.len());
        Ok(())
    }
}

fn parse_lists(root: Value) -> BTreeMap<String, Vec<ScoreEntry>> {
    let mut lists = BTreeMap::new();
    match root {
        Value::Object(map) => {
            for (puzzle, value) in map {
                match value {
                    Value::Array(items) => {
                        lists.insert(puzzle, parse_entries(items));
                    }
                    other => {
                        warn!(target: "highscores", "skipping {}: expected a list, got {}", puzzle, other)
                    }
                }
            }
        }
        Value::Array(items) => {
            info!(target: "highscores", "migrating flat highscore list to '{}'", LEGACY_PUZZLE_KEY);
            lists.insert(LEGACY_PUZZLE_KEY.to_string(), parse_entries(items));
        }
        other => warn!(target: "highscores", "unexpected highscore file root: {}", other),
    }
    lists
}

fn parse_entries(items: Vec<Value>) -> Vec<ScoreEntry> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ScoreEntry>(item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(target: "highscores", "skipping malformed entry: {}", err);
                None
            }
        })
        .collect()
}
