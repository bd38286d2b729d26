//! tushie — materializes in-code datasets into queryable SQLite tables.
//!
//! A data source hands over its rows once; tushie creates a physical table
//! for them, bulk-loads the rows in chunks, and records the source's
//! modification time in a metadata ledger. Later refreshes are no-ops until
//! the source changes. Concurrent refreshes of the same source are safe:
//! the only tolerated race is a duplicate CREATE TABLE, which the loser
//! treats as success.

pub mod error;
pub mod ledger;
pub mod loader;
pub mod provision;
pub mod refresh;
pub mod schema;
pub mod source;
pub mod store;
pub mod value;

pub use error::{Result, TushieError};
pub use ledger::{LedgerEntry, MetadataLedger};
pub use loader::BulkLoader;
pub use provision::TableProvisioner;
pub use refresh::{artifact_mtime, table_name_for, RefreshOutcome, TableCache};
pub use schema::{infer_columns, Column, ColumnType};
pub use source::{DataSource, DEFAULT_CHUNK_SIZE};
pub use store::Store;
pub use value::{Record, Value};
