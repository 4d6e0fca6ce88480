//! Data File
//!
//! The single append/overwrite file holding all data blocks.
//!
//! All I/O is positional (`pread`/`pwrite` style), so concurrent readers
//! holding the engine's shared lock never race on a seek cursor. Writers
//! need `&mut self`, which the engine only hands out under its exclusive
//! lock.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::record::{
    decode_block_header, payload_offset, BLOCK_HEADER_FIXED_LEN, DATA_VECTOR_DELIMITER,
    HEADER_DATA_DELIMITER, RECORD_END_DELIMITER,
};

use super::BlockExtent;

/// Window used when searching for a block's tail during the startup scan
const SCAN_WINDOW: usize = 64 * 1024;

/// A block found by [`DataFile::scan`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedBlock {
    pub extent: BlockExtent,
    pub is_active: bool,
    pub key: Vec<u8>,
}

/// Outcome of a sequential scan
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Blocks decoded before the scan stopped
    pub blocks: Vec<ScannedBlock>,

    /// Offset where decoding stopped (file length when complete)
    pub stopped_at: u64,

    /// False when the scan hit undecodable bytes before end of file
    pub complete: bool,
}

impl ScanReport {
    /// Extents of all inactive blocks
    pub fn inactive_extents(&self) -> impl Iterator<Item = BlockExtent> + '_ {
        self.blocks
            .iter()
            .filter(|b| !b.is_active)
            .map(|b| b.extent)
    }
}

/// Positional-I/O wrapper around the data file
#[derive(Debug)]
pub struct DataFile {
    file: File,
    path: PathBuf,
    len: u64,
    max_len: Option<u64>,
}

impl DataFile {
    /// Open or create the data file
    pub fn open(path: &Path, max_len: Option<u64>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            len,
            max_len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current file length; new blocks without a free slot land here
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read exactly the bytes covered by `extent`
    pub fn read_at(&self, extent: BlockExtent) -> io::Result<Vec<u8>> {
        if extent.end() > self.len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "range {}..{} past end of data file ({} bytes)",
                    extent.address,
                    extent.end(),
                    self.len
                ),
            ));
        }
        let mut buf = vec![0u8; extent.len as usize];
        read_exact_at(&self.file, &mut buf, extent.address)?;
        Ok(buf)
    }

    /// Write `bytes` at `address`, growing the file if needed
    pub fn write_at(&mut self, address: u64, bytes: &[u8]) -> io::Result<()> {
        let end = address + bytes.len() as u64;
        if let Some(max) = self.max_len {
            if end > max {
                return Err(io::Error::new(
                    io::ErrorKind::Other,
                    format!("data file limit of {} bytes exceeded (write ends at {})", max, end),
                ));
            }
        }

        write_all_at(&self.file, bytes, address)?;
        self.len = self.len.max(end);
        Ok(())
    }

    /// Overwrite the duplicated active flag of the block at `address`
    pub fn set_active_flag(&mut self, address: u64, active: bool) -> io::Result<()> {
        write_all_at(&self.file, &[active as u8], address)
    }

    /// Flush file contents to stable storage
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_data()
    }

    /// On-disk extent of the block at `address`, found by searching for its
    /// tail after the first `data_size` payload bytes.
    ///
    /// Covers any data vector, padding or bytes left behind by an in-place
    /// shrink. `None` if no tail follows.
    pub fn block_extent(&self, address: u64, key_len: usize, data_size: u32) -> io::Result<Option<BlockExtent>> {
        let payload_end = address + payload_offset(key_len) + data_size as u64;
        if payload_end > self.len {
            return Ok(None);
        }
        Ok(self
            .find_block_end(payload_end)?
            .map(|end| BlockExtent::new(address, end - address)))
    }

    /// Walk the file block by block from offset 0.
    ///
    /// Stops at the first block that does not decode; everything after that
    /// point is treated as unusable rather than as a fatal error.
    pub fn scan(&self) -> io::Result<ScanReport> {
        let mut report = ScanReport::default();
        let mut pos = 0u64;

        while pos < self.len {
            match self.scan_block(pos)? {
                Some(block) => {
                    pos = block.extent.end();
                    report.blocks.push(block);
                }
                None => {
                    report.stopped_at = pos;
                    return Ok(report);
                }
            }
        }

        report.stopped_at = pos;
        report.complete = true;
        Ok(report)
    }

    /// Decode the block at `pos`, or `None` if it is not a valid block
    fn scan_block(&self, pos: u64) -> io::Result<Option<ScannedBlock>> {
        if pos + BLOCK_HEADER_FIXED_LEN > self.len {
            return Ok(None);
        }

        let mut fixed = [0u8; BLOCK_HEADER_FIXED_LEN as usize];
        read_exact_at(&self.file, &mut fixed, pos)?;
        let key_len = u32::from_be_bytes([fixed[9], fixed[10], fixed[11], fixed[12]]) as usize;

        let payload_start = pos + payload_offset(key_len);
        if payload_start > self.len {
            return Ok(None);
        }

        let head = self.read_at(BlockExtent::new(pos, payload_start - pos))?;
        let header = match decode_block_header(&head, pos) {
            Ok((header, _)) => header,
            Err(e) => {
                tracing::debug!("Scan stopped at {}: {}", pos, e);
                return Ok(None);
            }
        };

        let end = match self.find_block_end(payload_start)? {
            Some(end) => end,
            None => return Ok(None),
        };

        Ok(Some(ScannedBlock {
            extent: BlockExtent::new(pos, end - pos),
            is_active: header.is_active,
            key: header.key,
        }))
    }

    /// Locate the end of a block whose payload starts at `payload_start`
    fn find_block_end(&self, payload_start: u64) -> io::Result<Option<u64>> {
        let (delimiter_at, is_vector) = match self.find_tail_delimiter(payload_start)? {
            Some(found) => found,
            None => return Ok(None),
        };

        if !is_vector {
            return Ok(Some(delimiter_at + RECORD_END_DELIMITER.len() as u64));
        }

        let count_at = delimiter_at + DATA_VECTOR_DELIMITER.len() as u64;
        if count_at + 4 > self.len {
            return Ok(None);
        }
        let count_bytes = self.read_at(BlockExtent::new(count_at, 4))?;
        let count = u32::from_be_bytes([count_bytes[0], count_bytes[1], count_bytes[2], count_bytes[3]]);

        let end_at = count_at + 4 + count as u64 * 4;
        let end_len = RECORD_END_DELIMITER.len() as u64;
        if end_at + end_len > self.len {
            return Ok(None);
        }
        let end = self.read_at(BlockExtent::new(end_at, end_len))?;
        if end.as_slice() != RECORD_END_DELIMITER {
            return Ok(None);
        }
        Ok(Some(end_at + end_len))
    }

    /// First vector or end delimiter at or after `start`; `true` for vector
    fn find_tail_delimiter(&self, start: u64) -> io::Result<Option<(u64, bool)>> {
        let overlap = DATA_VECTOR_DELIMITER
            .len()
            .max(RECORD_END_DELIMITER.len())
            .max(HEADER_DATA_DELIMITER.len())
            - 1;
        let mut pos = start;

        while pos < self.len {
            let n = (self.len - pos).min(SCAN_WINDOW as u64) as usize;
            let window = self.read_at(BlockExtent::new(pos, n as u64))?;

            let vector = find_subslice(&window, DATA_VECTOR_DELIMITER);
            let end = find_subslice(&window, RECORD_END_DELIMITER);
            let found = match (vector, end) {
                (Some(v), Some(e)) if v < e => Some((v, true)),
                (_, Some(e)) => Some((e, false)),
                (Some(v), None) => Some((v, true)),
                (None, None) => None,
            };
            if let Some((offset, is_vector)) = found {
                return Ok(Some((pos + offset as u64, is_vector)));
            }

            if pos + n as u64 >= self.len {
                break;
            }
            pos += (n - overlap) as u64;
        }
        Ok(None)
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.read_exact_at(buf, offset)
}

#[cfg(unix)]
fn write_all_at(file: &File, buf: &[u8], offset: u64) -> io::Result<()> {
    use std::os::unix::fs::FileExt;
    file.write_all_at(buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "failed to fill whole buffer",
                ))
            }
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(windows)]
fn write_all_at(file: &File, mut buf: &[u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;
    while !buf.is_empty() {
        match file.seek_write(buf, offset) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "failed to write whole buffer",
                ))
            }
            Ok(n) => {
                buf = &buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
