//! Full-table replacement in bounded-size insert batches.

use crate::error::{Result, TushieError};
use crate::schema::{quote_ident, Column};
use crate::source::DEFAULT_CHUNK_SIZE;
use crate::store::Store;
use crate::value::{Record, Value};
use tracing::{debug, info, warn};

/// Stateless bulk loader. Replaces a table's contents wholesale; there is
/// no delta path.
pub struct BulkLoader<'a> {
    store: &'a Store,
}

impl<'a> BulkLoader<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Truncate `table`, then insert `records` in consecutive batches of at
    /// most `chunk_size` rows, preserving record order. Returns the number
    /// of insert batches executed.
    ///
    /// Zero records is a valid no-op insert phase (the truncate still
    /// runs). A zero `chunk_size` falls back to the default. The insert
    /// column list is taken from the provisioned columns; a synthesized key
    /// absent from the data is left to the store to assign, and record
    /// fields without a matching column are dropped.
    pub fn replace_all(
        &self,
        table: &str,
        columns: &[Column],
        records: &[Record],
        chunk_size: usize,
    ) -> Result<usize> {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };

        let conn = self.store.connection();

        conn.execute(&format!("DELETE FROM {}", quote_ident(table)), [])
            .map_err(|e| TushieError::Load(format!("failed to truncate {}: {}", table, e)))?;

        let first = match records.first() {
            Some(first) => first,
            None => {
                info!(table, "replaced contents with empty dataset");
                return Ok(0);
            }
        };

        let dropped: Vec<&str> = first
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| !columns.iter().any(|c| c.name == *name))
            .collect();
        if !dropped.is_empty() {
            warn!(
                table,
                fields = ?dropped,
                "record fields have no matching column and will be dropped"
            );
        }

        let insert_cols: Vec<&Column> = columns
            .iter()
            .filter(|c| !c.primary_key || Value::of(first, &c.name).is_some())
            .collect();
        if insert_cols.is_empty() {
            return Err(TushieError::Load(format!(
                "no insertable columns for {}",
                table
            )));
        }

        let column_list: Vec<String> = insert_cols.iter().map(|c| quote_ident(&c.name)).collect();
        let row_placeholder = format!(
            "({})",
            vec!["?"; insert_cols.len()].join(", ")
        );

        let mut batches = 0;
        for chunk in records.chunks(chunk_size) {
            let placeholders = vec![row_placeholder.as_str(); chunk.len()].join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                quote_ident(table),
                column_list.join(", "),
                placeholders
            );

            let mut values: Vec<Value> = Vec::with_capacity(chunk.len() * insert_cols.len());
            for record in chunk {
                for col in &insert_cols {
                    values.push(Value::of(record, &col.name).cloned().unwrap_or(Value::Null));
                }
            }

            conn.execute(&sql, rusqlite::params_from_iter(values))
                .map_err(|e| TushieError::Load(format!("failed to insert into {}: {}", table, e)))?;

            batches += 1;
            debug!(table, batch = batches, rows = chunk.len(), "inserted batch");
        }

        info!(table, rows = records.len(), batches, "reloaded table");
        Ok(batches)
    }
}
