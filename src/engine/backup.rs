//! Backup copies and their manifest
//!
//! ```text
//! {backup_dir}/
//! ├── data.bin.backup     byte copy of the data file
//! ├── index.idx.backup    byte copy of the index file
//! └── backup.manifest     bincode(BackupManifest)
//! ```

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlabError};

pub const DATA_BACKUP_FILENAME: &str = "data.bin.backup";
pub const INDEX_BACKUP_FILENAME: &str = "index.idx.backup";
pub const MANIFEST_FILENAME: &str = "backup.manifest";

const COPY_BUFFER_SIZE: usize = 8192;

/// Lengths and CRC32 checksums of a backup's two copies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Epoch milliseconds when the copy was taken
    pub created_at: u64,
    pub data_len: u64,
    pub data_crc: u32,
    pub index_len: u64,
    pub index_crc: u32,
}

impl BackupManifest {
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| SlabError::Serialization(e.to_string()))?;
        let mut file = File::create(dir.join(MANIFEST_FILENAME))?;
        file.write_all(&bytes)?;
        file.sync_data()?;
        Ok(())
    }

    pub fn read_from(dir: &Path) -> Result<Self> {
        let bytes = fs::read(dir.join(MANIFEST_FILENAME))?;
        bincode::deserialize(&bytes).map_err(|e| SlabError::Serialization(e.to_string()))
    }

    /// Recompute both checksums and compare against the manifest
    pub fn verify(dir: &Path) -> Result<Self> {
        let manifest = Self::read_from(dir)?;

        let (data_len, data_crc) = checksum_file(&dir.join(DATA_BACKUP_FILENAME))?;
        if data_len != manifest.data_len || data_crc != manifest.data_crc {
            return Err(SlabError::Backup(format!(
                "data copy mismatch: expected {} bytes crc {:08x}, found {} bytes crc {:08x}",
                manifest.data_len, manifest.data_crc, data_len, data_crc
            )));
        }

        let (index_len, index_crc) = checksum_file(&dir.join(INDEX_BACKUP_FILENAME))?;
        if index_len != manifest.index_len || index_crc != manifest.index_crc {
            return Err(SlabError::Backup(format!(
                "index copy mismatch: expected {} bytes crc {:08x}, found {} bytes crc {:08x}",
                manifest.index_len, manifest.index_crc, index_len, index_crc
            )));
        }

        Ok(manifest)
    }
}

/// Copy `src` to `dst`, returning the length and CRC32 of the bytes copied.
///
/// A missing source produces an empty copy.
pub(crate) fn copy_with_checksum(src: &Path, dst: &Path) -> io::Result<(u64, u32)> {
    let mut out = File::create(dst)?;
    let mut input = match File::open(src) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            out.sync_data()?;
            return Ok((0, crc32fast::hash(&[])));
        }
        Err(e) => return Err(e),
    };

    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        out.write_all(&buf[..n])?;
        total += n as u64;
    }
    out.sync_data()?;

    Ok((total, hasher.finalize()))
}

fn checksum_file(path: &Path) -> Result<(u64, u32)> {
    let mut input = File::open(path)?;
    let mut hasher = crc32fast::Hasher::new();
    let mut buf = [0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok((total, hasher.finalize()))
}
