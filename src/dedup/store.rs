//! Keyed record store with optional expiry and a JSON snapshot file.
//!
//! The snapshot is a JSON array of records; each record supplies its own key
//! through [`StoredRecord`], so no key column is written. Expiry is not
//! persisted: records loaded from disk never expire.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// A record that can live in a [`RecordStore`].
pub trait StoredRecord: Clone + Serialize + DeserializeOwned {
    /// Key the record is filed under when loaded from a snapshot.
    fn key(&self) -> &str;
}

/// Lifetime of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Never expires and is never evicted.
    #[default]
    Never,
    /// Expires this long after it was set.
    After(Duration),
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory keyed store with optional file-backed persistence.
#[derive(Debug)]
pub struct RecordStore<V> {
    entries: HashMap<String, Entry<V>>,
    persist_path: Option<PathBuf>,
}

impl<V> Default for RecordStore<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            persist_path: None,
        }
    }
}

impl<V: StoredRecord> RecordStore<V> {
    /// Create an empty store with no snapshot file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store persisted at `path`, loading it if it exists.
    ///
    /// A missing file gives an empty store; a malformed one is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let mut store = Self {
            entries: HashMap::new(),
            persist_path: Some(path.to_path_buf()),
        };
        store.load(path)?;
        Ok(store)
    }

    /// Get a live record by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| &entry.value)
    }

    /// Insert or replace a record.
    pub fn set(&mut self, key: &str, value: V, ttl: Ttl) {
        let expires_at = match ttl {
            Ttl::Never => None,
            Ttl::After(duration) => Some(Instant::now() + duration),
        };
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
    }

    /// Modify a live record in place, returning it afterwards.
    ///
    /// The read and the write happen under one `&mut` borrow, so no other
    /// update can interleave. The entry's expiry is left unchanged.
    pub fn update<F>(&mut self, key: &str, f: F) -> Option<&V>
    where
        F: FnOnce(&mut V),
    {
        let now = Instant::now();
        let entry = self.entries.get_mut(key).filter(|e| !e.is_expired(now))?;
        f(&mut entry.value);
        Some(&entry.value)
    }

    /// Remove every record whose key contains `pattern`.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.contains(pattern));
        before - self.entries.len()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of all live records.
    pub fn list(&self) -> Vec<V> {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
            .collect()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.values().filter(|e| !e.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired records. Entries set with [`Ttl::Never`] are never touched.
    pub fn evict_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired records");
        }
        evicted
    }

    /// Merge records from a snapshot file into the store.
    ///
    /// A missing file is not an error. Loaded records never expire and
    /// replace in-memory records with the same key.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store file at {}, starting empty", path.display());
                return Ok(());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let records: Vec<V> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                Error::StoreCorrupt {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        let count = records.len();
        for record in records {
            let key = record.key().to_string();
            if self.entries.contains_key(&key) {
                warn!("Store file {} replaces record {}", path.display(), key);
            }
            self.entries.insert(
                key,
                Entry {
                    value: record,
                    expires_at: None,
                },
            );
        }

        debug!(count, "Loaded records from {}", path.display());
        Ok(())
    }

    /// Write all live records to the configured snapshot path.
    pub fn persist(&self) -> Result<()> {
        let path = self
            .persist_path
            .as_deref()
            .ok_or(Error::StoreNotPersistent)?;
        self.save_to(path)
    }

    /// Write all live records to `path`.
    ///
    /// Data goes to a temp file next to `path` first and is renamed over it,
    /// so an interrupted write leaves the previous snapshot intact.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut records = self.list();
        records.sort_by(|a, b| a.key().cmp(b.key()));

        let temp_path = temp_path_for(path);
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &records)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::Io(e));
        }

        debug!(count = records.len(), "Saved records to {}", path.display());
        Ok(())
    }
}

/// Temp file name used while writing a snapshot.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.tmp", process::id()));
    path.with_file_name(name)
}
