//! Free-Space Allocator
//!
//! Tracks reusable byte ranges of the data file.
//!
//! ## Policy
//! - Blocks are ordered by `(size, address)`, so the first entry at or above
//!   `(required, 0)` is the smallest block that fits (best fit, lowest address
//!   among equals).
//! - An oversized block is split; the tail goes back into the set. A tail
//!   shorter than the minimum split is not worth tracking, so the whole block
//!   is handed out instead.
//! - `release` never merges. Coalescing is a separate periodic pass.

use std::collections::BTreeSet;

use parking_lot::Mutex;

use super::BlockExtent;

/// A free byte range. Field order gives the `(size, address)` ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FreeBlock {
    pub size: u64,
    pub address: u64,
}

impl From<FreeBlock> for BlockExtent {
    fn from(block: FreeBlock) -> Self {
        BlockExtent::new(block.address, block.size)
    }
}

/// A range handed out by [`FreeSpaceAllocator::allocate_extent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Granted range; at least as long as requested
    pub extent: BlockExtent,

    /// Split-off tail that went back into the free set
    pub remainder: Option<BlockExtent>,
}

/// Best-fit free-space tracker (internally synchronized)
#[derive(Debug)]
pub struct FreeSpaceAllocator {
    blocks: Mutex<BTreeSet<FreeBlock>>,
    min_split: u64,
}

impl Default for FreeSpaceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeSpaceAllocator {
    /// Allocator that splits off any non-empty tail
    pub fn new() -> Self {
        Self::with_min_split(1)
    }

    /// Allocator that only splits when the tail is at least `min_split` bytes
    pub fn with_min_split(min_split: u64) -> Self {
        Self {
            blocks: Mutex::new(BTreeSet::new()),
            min_split: min_split.max(1),
        }
    }

    pub fn min_split(&self) -> u64 {
        self.min_split
    }

    /// Take `required` bytes from the smallest block that fits; returns the
    /// block address.
    ///
    /// Returns `None` when nothing fits; the caller appends at end of file.
    pub fn allocate(&self, required: u64) -> Option<u64> {
        self.allocate_extent(required)
            .map(|allocation| allocation.extent.address)
    }

    /// Like [`allocate`](Self::allocate), but reports the granted length and
    /// any split-off remainder
    pub fn allocate_extent(&self, required: u64) -> Option<Allocation> {
        if required == 0 {
            return None;
        }

        let mut blocks = self.blocks.lock();
        let candidate = blocks
            .range(FreeBlock {
                size: required,
                address: 0,
            }..)
            .next()
            .copied()?;

        blocks.remove(&candidate);
        let remaining = candidate.size - required;
        let (granted, remainder) = if remaining >= self.min_split {
            let tail = FreeBlock {
                size: remaining,
                address: candidate.address + required,
            };
            blocks.insert(tail);
            (required, Some(BlockExtent::from(tail)))
        } else {
            (candidate.size, None)
        };

        tracing::trace!(
            "Allocated {} of {} bytes at {} (split remainder {})",
            granted,
            candidate.size,
            candidate.address,
            remainder.map_or(0, |r| r.len)
        );
        Some(Allocation {
            extent: BlockExtent::new(candidate.address, granted),
            remainder,
        })
    }

    /// Return a range to the free set
    pub fn release(&self, address: u64, size: u64) {
        if size == 0 {
            return;
        }
        self.blocks.lock().insert(FreeBlock { size, address });
    }

    /// Coalesce address-adjacent blocks, replacing the whole set.
    ///
    /// Returns how many blocks were folded away.
    pub fn merge_adjacent(&self) -> usize {
        let mut blocks = self.blocks.lock();
        if blocks.len() < 2 {
            return 0;
        }

        let mut by_address: Vec<FreeBlock> = blocks.iter().copied().collect();
        by_address.sort_by_key(|b| b.address);

        let mut merged: Vec<FreeBlock> = Vec::with_capacity(by_address.len());
        let mut current = by_address[0];
        for next in by_address.into_iter().skip(1) {
            if current.address + current.size == next.address {
                current.size += next.size;
            } else {
                merged.push(current);
                current = next;
            }
        }
        merged.push(current);

        let folded = blocks.len() - merged.len();
        *blocks = merged.into_iter().collect();
        folded
    }

    /// Number of free blocks
    pub fn block_count(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Sum of all free block sizes
    pub fn total_free(&self) -> u64 {
        self.blocks.lock().iter().map(|b| b.size).sum()
    }

    /// Snapshot ordered by `(size, address)`
    pub fn blocks(&self) -> Vec<FreeBlock> {
        self.blocks.lock().iter().copied().collect()
    }

    pub fn clear(&self) {
        self.blocks.lock().clear();
    }
}
