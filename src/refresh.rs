//! Refresh orchestration: decide staleness, then provision + load + record
//! as one logical operation.

use crate::error::Result;
use crate::ledger::MetadataLedger;
use crate::loader::BulkLoader;
use crate::provision::TableProvisioner;
use crate::schema::infer_columns;
use crate::source::DataSource;
use crate::store::Store;
use std::path::Path;
use std::time::UNIX_EPOCH;
use tracing::{debug, info};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Physical table name for a logical source: a fixed prefix plus a hash of
/// the identifier, so repeated refreshes target the same table without a
/// ledger lookup.
///
/// The hash is 64-bit FNV-1a, spelled out here rather than taken from the
/// standard hasher: these names are persisted in the database and must be
/// recomputable by any future build against the same file.
pub fn table_name_for(logical_id: &str) -> String {
    let mut hash = FNV_OFFSET;
    for byte in logical_id.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    format!("tushie_{:016x}", hash)
}

/// Seconds-resolution modification time of a source artifact, for
/// implementing [`DataSource::source_mtime`] over a file on disk.
pub fn artifact_mtime(path: impl AsRef<Path>) -> Result<i64> {
    let modified = std::fs::metadata(path.as_ref())?.modified()?;
    Ok(modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Ledger says the cached table is current; nothing was touched.
    Fresh,
    /// The table was (re)provisioned, reloaded and the ledger updated.
    Refreshed,
}

/// Entry point. Owns the transition between ledger states; the provisioner
/// and loader are stateless services it drives.
pub struct TableCache {
    store: Store,
}

impl TableCache {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Bring the cached table for `source` up to date.
    ///
    /// A stale source always re-provisions before loading: provisioning an
    /// existing table is a no-op, and this avoids tracking a separate
    /// "table exists but stale" state. The three mutation steps are not one
    /// cross-store transaction; a crash between them just forces a
    /// redundant refresh next time.
    pub fn refresh(&self, source: &dyn DataSource) -> Result<RefreshOutcome> {
        let class_name = source.logical_id();
        let mtime = source.source_mtime();

        let ledger = MetadataLedger::new(&self.store);
        let stale = if !source.should_cache() {
            true
        } else {
            match ledger.lookup(&class_name)? {
                Some(entry) => mtime > entry.data_path_mtime,
                None => true,
            }
        };

        if !stale {
            debug!(%class_name, mtime, "cache is fresh");
            return Ok(RefreshOutcome::Fresh);
        }

        let rows = source.rows();
        let overrides = source.schema();
        let columns = infer_columns(
            rows.first(),
            &overrides,
            source.primary_key(),
            source.incrementing(),
            source.wants_timestamps(),
        );

        let table = table_name_for(&class_name);
        TableProvisioner::new(&self.store).ensure_table(&table, &columns)?;
        BulkLoader::new(&self.store).replace_all(&table, &columns, &rows, source.chunk_size())?;
        ledger.upsert(&class_name, &table, mtime)?;

        info!(%class_name, %table, mtime, rows = rows.len(), "refreshed cache");
        Ok(RefreshOutcome::Refreshed)
    }
}
