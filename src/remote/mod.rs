//! The spreadsheet that collects times from every kiosk.
//!
//! Only two operations are needed: read every row, and overwrite every row.
//! Appending is done by reading, concatenating and overwriting, which loses
//! updates if two kiosks sync at the same moment.

mod http_table;
mod memory_table;
mod row;

pub use http_table::HttpTable;
pub use memory_table::MemoryTable;
pub use row::{Cell, RemoteRow};

use crate::error::RemoteError;

pub trait RemoteTable {
    fn read_all(&self) -> Result<Vec<RemoteRow>, RemoteError>;

    fn overwrite_all(&mut self, rows: &[RemoteRow]) -> Result<(), RemoteError>;
}
