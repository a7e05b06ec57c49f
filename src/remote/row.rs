use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::serde_as;

/// One spreadsheet cell as it comes over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    Empty,
    /// Nested arrays or objects. Kept so an overwrite writes them back
    /// unchanged, but never read as a value.
    Other(Value),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::Bool(_) => false,
            Cell::Other(_) => true,
        }
    }

    /// Text rendering; whole numbers lose their `.0` so codes and student
    /// numbers read naturally.
    pub fn as_text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(match self {
            Cell::Text(text) => text.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty | Cell::Other(_) => return None,
        })
    }

    /// Spreadsheets hand booleans back as `TRUE`, `1`, or a real bool.
    pub fn as_bool(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Number(n) => *n != 0.0 && !n.is_nan(),
            Cell::Text(text) => matches!(
                text.trim().to_lowercase().as_str(),
                "true" | "1" | "yes" | "wahr" | "ja"
            ),
            Cell::Empty | Cell::Other(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

/// A row keyed by column name, in the order the columns appeared.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRow {
    #[serde_as(as = "serde_with::Map<_, _>")]
    cells: Vec<(String, Cell)>,
}

impl RemoteRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, cell: impl Into<Cell>) -> Self {
        self.set(column, cell.into());
        self
    }

    pub fn set(&mut self, column: &str, cell: Cell) {
        match self.cells.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = cell,
            None => self.cells.push((column.to_string(), cell)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Decodes a sheet body element by element; anything that is not a row
    /// object is logged and dropped.
    pub fn decode_rows(values: Vec<Value>) -> Vec<RemoteRow> {
        values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<RemoteRow>(value) {
                Ok(row) => Some(row),
                Err(err) => {
                    warn!(target: "remote", "skipping sheet row {}: {}", i + 1, err);
                    None
                }
            })
            .collect()
    }
}
