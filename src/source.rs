//! The boundary a cacheable dataset implements.

use crate::schema::ColumnType;
use crate::value::Record;

/// Default number of rows per insert batch.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// A logical data source: a dataset produced by application code that wants
/// to be queryable as a relational table.
///
/// Only `rows`, `logical_id` and `source_mtime` are required; the rest have
/// defaults matching the common case of an auto-incrementing `id` key.
pub trait DataSource {
    /// The dataset itself. Called once per refresh; the first record drives
    /// schema inference.
    fn rows(&self) -> Vec<Record>;

    /// Stable identifier for this dataset (e.g. the defining type's name).
    /// Drives both the ledger key and the physical table name.
    fn logical_id(&self) -> String;

    /// Modification time of the artifact the dataset originates from,
    /// in seconds since the epoch. See [`crate::refresh::artifact_mtime`].
    fn source_mtime(&self) -> i64;

    /// Explicit column type overrides. An entry here always wins over the
    /// type inferred from the sample record. May be empty.
    fn schema(&self) -> Vec<(String, ColumnType)> {
        Vec::new()
    }

    fn primary_key(&self) -> &str {
        "id"
    }

    /// Whether the primary key auto-increments. When true and the key is
    /// absent from the data, an integer key column is synthesized.
    fn incrementing(&self) -> bool {
        true
    }

    /// Whether `created_at`/`updated_at` columns should be added when the
    /// data does not already carry both.
    fn wants_timestamps(&self) -> bool {
        false
    }

    /// Rows per insert batch. Zero falls back to [`DEFAULT_CHUNK_SIZE`].
    fn chunk_size(&self) -> usize {
        DEFAULT_CHUNK_SIZE
    }

    /// Whether this source has a stable cached form at all. Sources
    /// returning false are reloaded on every refresh call.
    fn should_cache(&self) -> bool {
        true
    }
}
