//! Race-safe, idempotent table creation.

use crate::error::{Result, TushieError};
use crate::schema::{create_table_sql, Column};
use crate::store::Store;
use tracing::debug;

/// Stateless table-creation service. Concurrent callers may both observe a
/// missing table and both attempt the CREATE; the store rejects the loser
/// atomically and that rejection is absorbed here.
pub struct TableProvisioner<'a> {
    store: &'a Store,
}

impl<'a> TableProvisioner<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create `table` with the given columns if it does not exist yet.
    ///
    /// Deliberately a plain CREATE TABLE rather than IF NOT EXISTS: the
    /// duplicate rejection is re-classified against the catalog, so a lost
    /// creation race succeeds while any other failure propagates.
    pub fn ensure_table(&self, table: &str, columns: &[Column]) -> Result<()> {
        let sql = create_table_sql(table, columns)?;

        let created = {
            let conn = self.store.connection();
            conn.execute(&sql, [])
        };

        match created {
            Ok(_) => {
                debug!(table, "created table");
                Ok(())
            }
            Err(e) => {
                // SQLite reports a duplicate table under the generic
                // SQLITE_ERROR primary code, so the classification probes
                // the catalog instead of inspecting the error.
                if self.store.table_exists(table)? {
                    debug!(table, "table already exists, lost a benign creation race");
                    Ok(())
                } else {
                    Err(TushieError::Provisioning(format!(
                        "failed to create table {}: {}",
                        table, e
                    )))
                }
            }
        }
    }
}
