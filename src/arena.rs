//! BlockArena: a chain of fixed-capacity typed blocks holding one
//! homogeneous array too large for a single allocation.
//!
//! Addressing is `(block, offset)` derived from a logical element index;
//! all access is bounds-checked. Elements are `Pod` so a block can also
//! be viewed as raw bytes for verification without any pointer work.

use crate::error::Error;
use bytemuck::Pod;
use tracing::warn;

/// Default per-block byte budget.
pub const DEFAULT_BLOCK_BYTES: usize = 10_000_000;

/// Block-chained arena of `T` values.
pub struct BlockArena<T> {
    blocks: Vec<Box<[T]>>,
    per_block: usize,
    len: usize,
    block_bytes: usize,
}

impl<T: Pod> BlockArena<T> {
    /// Empty arena with the default block byte budget.
    pub fn new() -> Self {
        Self::with_block_bytes(DEFAULT_BLOCK_BYTES)
    }

    /// Empty arena with a custom block byte budget. The budget must hold
    /// at least one element.
    pub fn with_block_bytes(block_bytes: usize) -> Self {
        assert!(
            block_bytes >= size_of::<T>() && size_of::<T>() > 0,
            "block budget smaller than one element"
        );
        BlockArena {
            blocks: Vec::new(),
            per_block: block_bytes / size_of::<T>(),
            len: 0,
            block_bytes,
        }
    }

    /// Reserve and initialize storage for `nelem` elements.
    ///
    /// Allocates `ceil(nelem / per_block)` blocks and fills every slot of
    /// every block (tail slack included) with `init`. Fails with
    /// [`Error::AlreadyInitialized`] on a non-empty arena; call
    /// [`clear`](Self::clear) first.
    pub fn format_reserve(&mut self, nelem: usize, init: T) -> Result<(), Error> {
        if !self.blocks.is_empty() {
            return Err(Error::AlreadyInitialized);
        }
        let nblocks = nelem.div_ceil(self.per_block);
        self.blocks.reserve(nblocks);
        for _ in 0..nblocks {
            self.blocks.push(vec![init; self.per_block].into_boxed_slice());
        }
        self.len = nelem;
        Ok(())
    }

    /// Write `value` at logical index `i`.
    pub fn write(&mut self, i: usize, value: T) -> Result<(), Error> {
        if i >= self.len {
            return Err(Error::IndexOutOfRange {
                index: i,
                limit: self.len,
            });
        }
        self.blocks[i / self.per_block][i % self.per_block] = value;
        Ok(())
    }

    /// Read the value at logical index `i`.
    pub fn get(&self, i: usize) -> Result<T, Error> {
        if i >= self.len {
            return Err(Error::IndexOutOfRange {
                index: i,
                limit: self.len,
            });
        }
        Ok(self.blocks[i / self.per_block][i % self.per_block])
    }

    /// Drop every block and reset the arena to empty. Idempotent; a clear
    /// of an already-empty arena is a warning-visible no-op.
    pub fn clear(&mut self) {
        if self.blocks.is_empty() {
            warn!("arena is already empty");
            return;
        }
        self.blocks.clear();
        self.len = 0;
    }

    /// Reserved element count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Elements held by one block.
    #[inline]
    pub fn per_block(&self) -> usize {
        self.per_block
    }

    /// Number of allocated blocks.
    #[inline]
    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Per-block byte budget this arena was built with.
    #[inline]
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Raw byte view of block `b`, for byte-offset verification.
    pub fn block_as_bytes(&self, b: usize) -> Option<&[u8]> {
        self.blocks.get(b).map(|blk| bytemuck::cast_slice(blk))
    }

    /// Iterate the reserved elements, walking the block chain strictly
    /// forward and advancing to the next block only when the current one
    /// is exhausted.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.blocks.iter().flat_map(|b| b.iter()).take(self.len)
    }
}

impl<T: Pod> Default for BlockArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
