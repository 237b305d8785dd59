// SPDX-License-Identifier: Apache-2.0

//! Per-document bump arena.
//!
//! An [`Arena`] carves allocations out of chunks it obtains from its
//! [`Allocator`]. Chunks are linked through a small header at their start and
//! are only returned to the allocator when the arena is dropped, so every
//! reference handed out by the arena stays valid for the arena's lifetime.
//! Items stored here are never dropped individually, which is why only `Copy`
//! data is accepted.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::{self, NonNull};

use crate::allocator::{Allocator, Heap, OutOfMemory};

/// Size of the first chunk; later chunks double up to [`MAX_CHUNK_SIZE`].
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;
/// Chunk growth stops doubling here. Larger requests still get a dedicated chunk.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

const CHUNK_ALIGN: usize = 16;

struct ChunkHeader {
    prev: Option<NonNull<ChunkHeader>>,
    layout: Layout,
}

/// Owner of all storage reachable from a parsed tree.
pub struct Arena<A: Allocator = Heap> {
    alloc: A,
    head: Cell<Option<NonNull<ChunkHeader>>>,
    cursor: Cell<*mut u8>,
    end: Cell<*mut u8>,
    next_chunk_size: Cell<usize>,
    chunk_count: Cell<usize>,
    reserved: Cell<usize>,
    used: Cell<usize>,
}

impl Arena<Heap> {
    /// Creates an empty arena over the global heap.
    pub fn new() -> Self {
        Self::with_allocator(Heap)
    }
}

impl Default for Arena<Heap> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Allocator> Arena<A> {
    /// Creates an empty arena; no memory is requested until the first allocation.
    pub fn with_allocator(alloc: A) -> Self {
        Self {
            alloc,
            head: Cell::new(None),
            cursor: Cell::new(ptr::null_mut()),
            end: Cell::new(ptr::null_mut()),
            next_chunk_size: Cell::new(DEFAULT_CHUNK_SIZE),
            chunk_count: Cell::new(0),
            reserved: Cell::new(0),
            used: Cell::new(0),
        }
    }

    /// The allocator backing this arena.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Number of chunks obtained from the allocator.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count.get()
    }

    /// Total bytes obtained from the allocator, chunk headers included.
    pub fn reserved_bytes(&self) -> usize {
        self.reserved.get()
    }

    /// Bytes handed out to callers, alignment padding excluded.
    pub fn used_bytes(&self) -> usize {
        self.used.get()
    }

    /// Copies the concatenation of `parts` into one tight arena block.
    ///
    /// An empty concatenation owns no storage and returns an empty slice.
    pub fn alloc_joined<T: Copy>(&self, parts: &[&[T]]) -> Result<&[T], OutOfMemory> {
        let total = parts
            .iter()
            .try_fold(0usize, |acc, part| acc.checked_add(part.len()))
            .ok_or(OutOfMemory)?;
        if total == 0 {
            return Ok(&[]);
        }
        let layout = Layout::array::<T>(total).map_err(|_| OutOfMemory)?;
        let dst = if layout.size() == 0 {
            NonNull::<T>::dangling()
        } else {
            self.alloc_raw(layout)?.cast::<T>()
        };
        let mut offset = 0;
        for part in parts {
            // SAFETY: `dst` holds `total` slots and the parts fill them in order.
            unsafe {
                ptr::copy_nonoverlapping(part.as_ptr(), dst.as_ptr().add(offset), part.len())
            };
            offset += part.len();
        }
        // SAFETY: every slot was written above; the block lives until `self` drops.
        Ok(unsafe { core::slice::from_raw_parts(dst.as_ptr(), total) })
    }

    /// Copies `items` into the arena.
    pub fn alloc_slice<T: Copy>(&self, items: &[T]) -> Result<&[T], OutOfMemory> {
        self.alloc_joined(&[items])
    }

    fn alloc_raw(&self, layout: Layout) -> Result<NonNull<u8>, OutOfMemory> {
        if let Some(block) = self.bump(layout) {
            return Ok(block);
        }
        self.grow(layout)?;
        self.bump(layout).ok_or(OutOfMemory)
    }

    fn bump(&self, layout: Layout) -> Option<NonNull<u8>> {
        let cursor = self.cursor.get();
        if cursor.is_null() {
            return None;
        }
        let available = (self.end.get() as usize).checked_sub(cursor as usize)?;
        let padding = cursor.align_offset(layout.align());
        let needed = padding.checked_add(layout.size())?;
        if needed > available {
            return None;
        }
        let block = cursor.wrapping_add(padding);
        self.cursor.set(block.wrapping_add(layout.size()));
        self.used.set(self.used.get() + layout.size());
        NonNull::new(block)
    }

    fn grow(&self, layout: Layout) -> Result<(), OutOfMemory> {
        let header = Layout::new::<ChunkHeader>();
        let data_offset = header.size().next_multiple_of(CHUNK_ALIGN);
        let needed = data_offset
            .checked_add(layout.align())
            .and_then(|n| n.checked_add(layout.size()))
            .ok_or(OutOfMemory)?;
        let size = self.next_chunk_size.get().max(needed);
        let chunk_layout = Layout::from_size_align(size, CHUNK_ALIGN.max(header.align()))
            .map_err(|_| OutOfMemory)?;
        let base = self.alloc.allocate(chunk_layout).ok_or(OutOfMemory)?;

        // SAFETY: the chunk is at least `data_offset` bytes and aligned for the header.
        unsafe {
            base.cast::<ChunkHeader>().as_ptr().write(ChunkHeader {
                prev: self.head.get(),
                layout: chunk_layout,
            })
        };
        self.head.set(Some(base.cast()));
        self.cursor.set(base.as_ptr().wrapping_add(data_offset));
        self.end.set(base.as_ptr().wrapping_add(size));
        self.next_chunk_size
            .set(size.saturating_mul(2).min(MAX_CHUNK_SIZE).max(DEFAULT_CHUNK_SIZE));
        self.chunk_count.set(self.chunk_count.get() + 1);
        self.reserved.set(self.reserved.get() + size);
        log::trace!(
            "arena chunk #{} of {} bytes reserved",
            self.chunk_count.get(),
            size
        );
        Ok(())
    }
}

impl<A: Allocator> Drop for Arena<A> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(chunk) = next {
            // SAFETY: every chunk starts with a header written by `grow`, is
            // linked exactly once and is freed exactly once here.
            unsafe {
                let header = chunk.as_ptr().read();
                next = header.prev;
                self.alloc.free(chunk.cast(), header.layout);
            }
        }
        self.cursor.set(ptr::null_mut());
        self.end.set(ptr::null_mut());
    }
}

impl<A: Allocator> core::fmt::Debug for Arena<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("chunks", &self.chunk_count())
            .field("reserved_bytes", &self.reserved_bytes())
            .field("used_bytes", &self.used_bytes())
            .finish()
    }
}
