//! Header Index
//!
//! Ordered key -> [`HeaderRecord`] map, persisted as a whole on every
//! mutation.
//!
//! ## File Format
//! ```text
//! ┌──────────┬────────────────┬──────────┬────────────────┬─────┐
//! │ Len (4)  │ HeaderRecord   │ Len (4)  │ HeaderRecord   │ ... │
//! └──────────┴────────────────┴──────────┴────────────────┴─────┘
//! ```
//!
//! Each persist rewrites the full file (written to a sibling temp file and
//! renamed over the old one). Cost is O(index size) per mutation.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::BufMut;
use parking_lot::{Mutex, RwLock};

use crate::error::{Result, SlabError};
use crate::record::HeaderRecord;
use crate::wire::WireReader;

/// Persisted, internally synchronized header index
#[derive(Debug)]
pub struct HeaderIndex {
    path: PathBuf,
    entries: RwLock<BTreeMap<Vec<u8>, HeaderRecord>>,

    /// Serializes mutate-then-persist so file writes land in mutation order
    persist_lock: Mutex<()>,
}

impl HeaderIndex {
    /// Load the index at `path`, or start empty if the file does not exist
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let bytes = fs::read(path)?;
            Self::load(&bytes)?
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Loaded {} header records from {:?}", entries.len(), path);

        Ok(Self {
            path: path.to_path_buf(),
            entries: RwLock::new(entries),
            persist_lock: Mutex::new(()),
        })
    }

    fn load(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, HeaderRecord>> {
        let mut entries = BTreeMap::new();
        let mut reader = WireReader::new(bytes);

        while !reader.is_empty() {
            let offset = reader.position();
            let record = match reader.len_prefixed("header record") {
                Ok(record) => record,
                Err(e) => {
                    // A torn final write; everything before it is intact
                    tracing::warn!("Index file truncated at offset {}: {}", offset, e);
                    break;
                }
            };

            let header = HeaderRecord::decode(record).map_err(|e| {
                SlabError::CorruptIndex(format!("record at offset {}: {}", offset, e))
            })?;
            entries.insert(header.key.clone(), header);
        }

        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the header for `key`, active or not
    pub fn get(&self, key: &[u8]) -> Option<HeaderRecord> {
        self.entries.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Install `header` under its key and persist.
    ///
    /// Returns the header it replaced.
    pub fn insert(&self, header: HeaderRecord) -> Result<Option<HeaderRecord>> {
        let _persist = self.persist_lock.lock();
        let previous = {
            let mut entries = self.entries.write();
            entries.insert(header.key.clone(), header)
        };
        self.persist_locked()?;
        Ok(previous)
    }

    /// Remove `key` and persist if it was present
    pub fn remove(&self, key: &[u8]) -> Result<Option<HeaderRecord>> {
        let _persist = self.persist_lock.lock();
        let removed = self.entries.write().remove(key);
        if removed.is_some() {
            self.persist_locked()?;
        }
        Ok(removed)
    }

    /// Remove every header matching `predicate`, persisting once.
    ///
    /// Returns the removed headers.
    pub fn remove_where<F>(&self, mut predicate: F) -> Result<Vec<HeaderRecord>>
    where
        F: FnMut(&HeaderRecord) -> bool,
    {
        let _persist = self.persist_lock.lock();
        let removed: Vec<HeaderRecord> = {
            let mut entries = self.entries.write();
            let keys: Vec<Vec<u8>> = entries
                .values()
                .filter(|h| predicate(h))
                .map(|h| h.key.clone())
                .collect();
            keys.iter().filter_map(|k| entries.remove(k)).collect()
        };
        if !removed.is_empty() {
            self.persist_locked()?;
        }
        Ok(removed)
    }

    /// Visit every header in key order under the shared lock
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&HeaderRecord),
    {
        for header in self.entries.read().values() {
            f(header);
        }
    }

    /// All headers in key order
    pub fn snapshot(&self) -> Vec<HeaderRecord> {
        self.entries.read().values().cloned().collect()
    }

    /// Number of headers, active and tombstoned
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Rewrite the index file from the in-memory map
    pub fn persist(&self) -> Result<()> {
        let _persist = self.persist_lock.lock();
        self.persist_locked()
    }

    fn persist_locked(&self) -> Result<()> {
        let buf = {
            let entries = self.entries.read();
            let size: usize = entries.values().map(|h| 4 + h.encoded_len()).sum();
            let mut buf = Vec::with_capacity(size);
            for header in entries.values() {
                buf.put_u32(header.encoded_len() as u32);
                header.encode_into(&mut buf);
            }
            buf
        };

        let tmp_path = self.path.with_extension("idx.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&buf)?;
            file.sync_data()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        tracing::trace!("Persisted index ({} bytes) to {:?}", buf.len(), self.path);
        Ok(())
    }
}
