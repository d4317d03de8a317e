//! Fingerprint-keyed index of first-seen files.

use std::path::Path;

use crate::dedup::hash::is_fingerprint;
use crate::dedup::record::ContentRecord;
use crate::dedup::store::{RecordStore, Ttl};
use crate::error::Result;

/// Persistent map from content fingerprint to [`ContentRecord`].
///
/// Holds at most one record per fingerprint. Records are always stored with
/// [`Ttl::Never`], so no record is ever evicted behind the caller's back.
#[derive(Debug, Default)]
pub struct DedupIndex {
    store: RecordStore<ContentRecord>,
}

impl DedupIndex {
    /// Create an in-memory index with no snapshot file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the index persisted at `path`; a missing file gives an empty index.
    pub fn open(path: &Path) -> Result<Self> {
        let store: RecordStore<ContentRecord> = RecordStore::open(path)?;

        let malformed = store
            .list()
            .iter()
            .filter(|record| !is_fingerprint(&record.md5))
            .count();
        if malformed > 0 {
            tracing::warn!(
                "{} records in {} have a malformed fingerprint",
                malformed,
                path.display()
            );
        }

        Ok(Self { store })
    }

    /// Look up the record for a fingerprint.
    pub fn lookup(&self, md5: &str) -> Option<&ContentRecord> {
        self.store.get(md5)
    }

    /// Count one more duplicate of a known fingerprint.
    ///
    /// Returns the new duplicate count, or `None` if the fingerprint is unknown.
    pub fn record_duplicate(&mut self, md5: &str) -> Option<u64> {
        self.store
            .update(md5, |record| record.duplicates += 1)
            .map(|record| record.duplicates)
    }

    /// Store the record for a first-seen fingerprint.
    ///
    /// Returns `false` and leaves the index untouched if the fingerprint is
    /// already present.
    pub fn insert_original(&mut self, record: ContentRecord) -> bool {
        if self.store.get(&record.md5).is_some() {
            return false;
        }
        let key = record.md5.clone();
        self.store.set(&key, record, Ttl::Never);
        true
    }

    /// Remove every record whose fingerprint contains `pattern`.
    pub fn purge(&mut self, pattern: &str) -> usize {
        self.store.delete_matching(pattern)
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Snapshot of all records.
    pub fn records(&self) -> Vec<ContentRecord> {
        self.store.list()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Write the index to its snapshot file.
    pub fn persist(&self) -> Result<()> {
        self.store.persist()
    }

    /// Write the index to an arbitrary file.
    pub fn export(&self, path: &Path) -> Result<()> {
        self.store.save_to(path)
    }
}
