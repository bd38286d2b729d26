//! Store handle wrapping a single SQLite connection.
//!
//! Every component takes an explicit `&Store` instead of reaching for a
//! global connection, so tests can substitute an in-memory database.

use crate::error::{Result, TushieError};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| TushieError::Store(format!("failed to open database: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Its tables live exactly as long as this
    /// store handle.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| TushieError::Store(format!("failed to open in-memory database: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Exclusive access to the underlying connection.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Whether a table of the given name exists in the catalog.
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let conn = self.connection();
        let found = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .map(|_| true);

        match found {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
            Err(e) => Err(TushieError::Store(format!(
                "failed to probe catalog for {}: {}",
                name, e
            ))),
        }
    }
}
