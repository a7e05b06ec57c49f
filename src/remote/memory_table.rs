use std::cell::RefCell;
use std::rc::Rc;

use super::{RemoteRow, RemoteTable};
use crate::error::RemoteError;

/// In-process table. Clones share the same rows, so a test can keep a handle
/// while the session owns another. `set_online(false)` makes every call fail
/// the way an unreachable server would.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    rows: Rc<RefCell<Vec<RemoteRow>>>,
    online: Rc<RefCell<bool>>,
}

impl Default for MemoryTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryTable {
    pub fn new(rows: Vec<RemoteRow>) -> Self {
        Self {
            rows: Rc::new(RefCell::new(rows)),
            online: Rc::new(RefCell::new(true)),
        }
    }

    pub fn set_online(&self, online: bool) {
        *self.online.borrow_mut() = online;
    }

    pub fn rows(&self) -> Vec<RemoteRow> {
        self.rows.borrow().clone()
    }

    fn check_online(&self) -> Result<(), RemoteError> {
        if *self.online.borrow() {
            Ok(())
        } else {
            Err(RemoteError::Transport("table is offline".to_string()))
        }
    }
}

impl RemoteTable for MemoryTable {
    fn read_all(&self) -> Result<Vec<RemoteRow>, RemoteError> {
        self.check_online()?;
        Ok(self.rows())
    }

    fn overwrite_all(&mut self, rows: &[RemoteRow]) -> Result<(), RemoteError> {
        self.check_online()?;
        *self.rows.borrow_mut() = rows.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_rows() {
        let table = MemoryTable::default();
        let mut handle = table.clone();
        handle
            .overwrite_all(&[RemoteRow::new().with("Player", "Ada")])
            .unwrap();
        assert_eq!(table.read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_offline_fails() {
        let mut table = MemoryTable::default();
        table.set_online(false);
        assert!(matches!(table.read_all(), Err(RemoteError::Transport(_))));
        assert!(table.overwrite_all(&[]).is_err());
    }
}
