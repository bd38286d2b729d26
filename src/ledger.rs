//! Metadata ledger: one row per cached source, tracking which physical
//! table holds its data and the source mtime recorded at the last refresh.

use crate::error::{Result, TushieError};
use crate::provision::TableProvisioner;
use crate::schema::{Column, ColumnType};
use crate::store::Store;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const LEDGER_TABLE: &str = "tushie_metadata";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub class_name: String,
    pub table_name: String,
    pub data_path_mtime: i64,
}

pub struct MetadataLedger<'a> {
    store: &'a Store,
}

impl<'a> MetadataLedger<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    fn ledger_columns() -> Vec<Column> {
        vec![
            Column::new("class_name", ColumnType::Text),
            Column::new("table_name", ColumnType::Text),
            Column::new("data_path_mtime", ColumnType::Integer),
        ]
    }

    /// Find the entry for a logical source, if any.
    ///
    /// A missing ledger table means this process is the first to cache
    /// anything: the answer is "no entry", never an error.
    pub fn lookup(&self, class_name: &str) -> Result<Option<LedgerEntry>> {
        if !self.store.table_exists(LEDGER_TABLE)? {
            debug!("ledger table not bootstrapped yet, treating every source as stale");
            return Ok(None);
        }

        let conn = self.store.connection();
        let entry = conn.query_row(
            "SELECT class_name, table_name, data_path_mtime FROM tushie_metadata \
             WHERE class_name = ?1",
            [class_name],
            |row| {
                Ok(LedgerEntry {
                    class_name: row.get(0)?,
                    table_name: row.get(1)?,
                    data_path_mtime: row.get(2)?,
                })
            },
        );

        match entry {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TushieError::Ledger(format!(
                "failed to look up {}: {}",
                class_name, e
            ))),
        }
    }

    /// Record a completed refresh: insert-or-update keyed on
    /// `(class_name, table_name)`, creating the ledger table on first use
    /// with the same race tolerance as any other table.
    pub fn upsert(&self, class_name: &str, table_name: &str, data_path_mtime: i64) -> Result<()> {
        TableProvisioner::new(self.store).ensure_table(LEDGER_TABLE, &Self::ledger_columns())?;

        let mut conn = self.store.connection();
        let tx = conn
            .transaction()
            .map_err(|e| TushieError::Ledger(format!("failed to start transaction: {}", e)))?;

        let updated = tx
            .execute(
                "UPDATE tushie_metadata SET data_path_mtime = ?3 \
                 WHERE class_name = ?1 AND table_name = ?2",
                rusqlite::params![class_name, table_name, data_path_mtime],
            )
            .map_err(|e| TushieError::Ledger(format!("failed to update entry: {}", e)))?;

        if updated == 0 {
            tx.execute(
                "INSERT INTO tushie_metadata (class_name, table_name, data_path_mtime) \
                 VALUES (?1, ?2, ?3)",
                rusqlite::params![class_name, table_name, data_path_mtime],
            )
            .map_err(|e| TushieError::Ledger(format!("failed to insert entry: {}", e)))?;
        }

        tx.commit()
            .map_err(|e| TushieError::Ledger(format!("failed to commit upsert: {}", e)))?;

        debug!(class_name, table_name, data_path_mtime, "recorded refresh");
        Ok(())
    }
}
